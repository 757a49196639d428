//! Explicit mock fallback
//!
//! [`OfflineClient`] tries the live backend first. When the call fails in a
//! way that does not involve the session (network error, timeout, non-2xx
//! other than 401, malformed body) it serves a mock value instead and tags it
//! with [`Origin::Mock`]. A 401 is never masked.

mod fixtures;

pub use fixtures::{MOCK_PASSWORD, MockBackend};

use std::sync::Arc;

use shared::client::LoginResponse;
use shared::models::{
    PaymentRequest, PaymentRequestCreate, PaymentRequestUpdate, PaymentRequestUpdated,
    RequestFilter, RequestList, RequestStatus, ReviewOutcome, Role, RoleChanged, UploadedFile,
    User,
};

use crate::api::ApiClient;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::SessionStore;
use crate::{ClientConfig, ClientError, ClientResult};

/// Where a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Backend,
    Mock,
}

/// A value plus its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Served<T> {
    pub fn backend(value: T) -> Self {
        Self {
            value,
            origin: Origin::Backend,
        }
    }

    pub fn mock(value: T) -> Self {
        Self {
            value,
            origin: Origin::Mock,
        }
    }

    pub fn is_mock(&self) -> bool {
        self.origin == Origin::Mock
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Served<U> {
        Served {
            value: f(self.value),
            origin: self.origin,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// API client with opt-in degradation to mock data
#[derive(Debug)]
pub struct OfflineClient<C = NetworkHttpClient> {
    api: ApiClient<C>,
    mock: MockBackend,
    fallback: bool,
}

impl OfflineClient<NetworkHttpClient> {
    pub fn connect(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        Ok(Self::new(ApiClient::connect(config, session)?, config.fallback))
    }
}

impl<C: HttpClient> OfflineClient<C> {
    pub fn new(api: ApiClient<C>, fallback: bool) -> Self {
        Self {
            api,
            mock: MockBackend::new(),
            fallback,
        }
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback
    }

    fn serve<T>(
        &self,
        operation: &'static str,
        live: ClientResult<T>,
        mock: impl FnOnce(&MockBackend) -> ClientResult<T>,
    ) -> ClientResult<Served<T>> {
        match live {
            Ok(value) => Ok(Served::backend(value)),
            Err(e) if self.fallback && e.is_fallback_eligible() => {
                tracing::warn!(error = %e, operation, "API unavailable, using mock data");
                mock(&self.mock).map(Served::mock)
            }
            Err(e) => Err(e),
        }
    }

    // ========== Auth ==========

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Served<LoginResponse>> {
        let live = self.api.auth().login(email, password).await;
        let served = self.serve("login", live, |mock| mock.login(email, password))?;
        if served.is_mock() {
            self.session()
                .set_auth(&served.value.token, &served.value.user)?;
        }
        Ok(served)
    }

    /// The session is cleared even when the backend cannot be reached
    pub async fn logout(&self) -> ClientResult<Served<()>> {
        match self.api.auth().logout().await {
            Ok(()) => Ok(Served::backend(())),
            Err(e @ ClientError::Storage(_)) => Err(e),
            Err(e) if self.fallback => {
                tracing::warn!(error = %e, "API unavailable for logout");
                Ok(Served::mock(()))
            }
            Err(e) => Err(e),
        }
    }

    /// Falls back to the stored profile
    pub async fn me(&self) -> ClientResult<Served<User>> {
        let session = self.session().clone();
        match self.api.auth().me().await {
            Ok(user) => Ok(Served::backend(user)),
            Err(e) if self.fallback && e.is_fallback_eligible() => match session.user() {
                Some(user) => {
                    tracing::warn!(error = %e, "API unavailable, using stored profile");
                    Ok(Served::mock(user))
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    // ========== Payment requests ==========

    pub async fn list_requests(&self, filter: &RequestFilter) -> ClientResult<Served<RequestList>> {
        let live = self.api.requests().list(filter).await;
        self.serve("list_requests", live, |mock| Ok(mock.list(filter)))
    }

    pub async fn get_request(&self, id: i64) -> ClientResult<Served<PaymentRequest>> {
        let live = self.api.requests().get(id).await;
        self.serve("get_request", live, |mock| mock.get(id))
    }

    pub async fn create_request(
        &self,
        payload: &PaymentRequestCreate,
    ) -> ClientResult<Served<PaymentRequest>> {
        let live = self.api.requests().create(payload).await;
        self.serve("create_request", live, |mock| Ok(mock.create(payload)))
    }

    pub async fn update_request(
        &self,
        id: i64,
        changes: &PaymentRequestUpdate,
    ) -> ClientResult<Served<PaymentRequestUpdated>> {
        let live = self.api.requests().update(id, changes).await;
        self.serve("update_request", live, |mock| Ok(mock.update(id, changes)))
    }

    pub async fn approve(&self, id: i64, comment: &str) -> ClientResult<Served<ReviewOutcome>> {
        let live = self.api.requests().approve(id, comment).await;
        self.serve("approve", live, |mock| {
            Ok(mock.review(id, RequestStatus::Approved, comment))
        })
    }

    pub async fn reject(&self, id: i64, comment: &str) -> ClientResult<Served<ReviewOutcome>> {
        let live = self.api.requests().reject(id, comment).await;
        self.serve("reject", live, |mock| {
            Ok(mock.review(id, RequestStatus::Rejected, comment))
        })
    }

    pub async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Served<UploadedFile>> {
        let live = self.api.requests().upload_file(filename, bytes).await;
        self.serve("upload_file", live, |mock| Ok(mock.upload(filename)))
    }

    // ========== Users ==========

    pub async fn list_users(&self) -> ClientResult<Served<Vec<User>>> {
        let live = self.api.users().list().await;
        self.serve("list_users", live, |mock| Ok(mock.users()))
    }

    pub async fn update_role(&self, user_id: i64, role: Role) -> ClientResult<Served<RoleChanged>> {
        let live = self.api.users().update_role(user_id, role).await;
        self.serve("update_role", live, |mock| Ok(mock.role_changed(user_id, role)))
    }
}
