//! HTTP client for network-based API calls

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;

use crate::session::SessionStore;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP transport used by the typed API groups
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    /// Multipart upload with a single `file` part
    async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<T>;
    /// Session the token is read from (and cleared on 401)
    fn session(&self) -> &Arc<SessionStore>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Token is read per request so a login or a 401 clear takes effect
    /// immediately.
    fn auth_header(&self) -> Option<String> {
        self.session.token().map(|t| format!("Bearer {}", t))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_header() {
            Some(auth) => req.header(reqwest::header::AUTHORIZATION, auth),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(req).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %url, "Backend answered 401, clearing session");
            if let Err(e) = self.session.clear() {
                tracing::error!(error = %e, "Failed to clear session after 401");
            }
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            // Error envelope first
            if let Ok(envelope) = serde_json::from_str::<ApiResponse<()>>(&text) {
                if let Some(code) = envelope.code {
                    return Err(ClientError::Api {
                        code,
                        message: envelope.message,
                        details: envelope.details,
                    });
                }
            }
            return match status {
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(text))
                }
                _ => Err(ClientError::Internal(format!("{}: {}", status, text))),
            };
        }

        // Empty bodies (204, logout) decode as `null`
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body)
            .map_err(|e| ClientError::InvalidResponse(format!("{} ({})", e, url)))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        self.send(self.client.get(self.url(path)).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.post(self.url(path))).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<T> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);
        self.send(self.client.post(self.url(path)).multipart(form))
            .await
    }

    fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let session = Arc::new(SessionStore::in_memory());
        let client =
            NetworkHttpClient::new(&ClientConfig::new("http://api.test/api/"), session).unwrap();
        assert_eq!(client.base_url(), "http://api.test/api");
        assert_eq!(client.url("/auth/me"), "http://api.test/api/auth/me");
        assert_eq!(client.url("users"), "http://api.test/api/users");
    }

    #[test]
    fn test_auth_header_follows_session() {
        let session = Arc::new(SessionStore::in_memory());
        let client =
            NetworkHttpClient::new(&ClientConfig::default(), session.clone()).unwrap();
        assert!(client.auth_header().is_none());

        let user = shared::models::User {
            id: 1,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            role: shared::models::Role::Employee,
            department: None,
        };
        session.set_auth("abc", &user).unwrap();
        assert_eq!(client.auth_header().as_deref(), Some("Bearer abc"));
    }
}
