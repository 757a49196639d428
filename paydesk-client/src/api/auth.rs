//! Auth endpoints

use shared::client::{LoginRequest, LoginResponse};
use shared::models::User;

use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

pub struct AuthApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> AuthApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `POST /auth/login`, storing the returned session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self
            .http
            .post("auth/login", &req)
            .await
            .map_err(|e| match e {
                ClientError::Unauthorized => ClientError::InvalidCredentials,
                other => other,
            })?;
        self.http.session().set_auth(&resp.token, &resp.user)?;
        tracing::info!(user_id = resp.user.id, role = %resp.user.role, "Logged in");
        Ok(resp)
    }

    /// `POST /auth/logout`; the local session is cleared whatever the outcome
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.http.post_empty::<serde_json::Value>("auth/logout").await;
        self.http.session().clear()?;
        result.map(|_| ())
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> ClientResult<User> {
        self.http.get("auth/me").await
    }
}
