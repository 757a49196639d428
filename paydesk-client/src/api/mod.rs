//! Typed API groups
//!
//! ```no_run
//! # async fn example() -> paydesk_client::ClientResult<()> {
//! use std::sync::Arc;
//! use paydesk_client::{ApiClient, ClientConfig, SessionStore};
//!
//! let session = Arc::new(SessionStore::in_memory());
//! let api = ApiClient::connect(&ClientConfig::from_env(), session)?;
//! let login = api.auth().login("jane@example.com", "password").await?;
//! let pending = api.requests().list(&Default::default()).await?;
//! # let _ = (login, pending);
//! # Ok(())
//! # }
//! ```

mod auth;
mod requests;
mod users;

use std::sync::Arc;

pub use auth::AuthApi;
pub use requests::RequestsApi;
pub use users::UsersApi;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::SessionStore;
use crate::{ClientConfig, ClientResult};

/// Entry point to the backend, generic over the transport
#[derive(Debug, Clone)]
pub struct ApiClient<C = NetworkHttpClient> {
    http: C,
}

impl ApiClient<NetworkHttpClient> {
    /// Build a network client from configuration
    pub fn connect(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config, session)?))
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn auth(&self) -> AuthApi<'_, C> {
        AuthApi::new(&self.http)
    }

    pub fn requests(&self) -> RequestsApi<'_, C> {
        RequestsApi::new(&self.http)
    }

    pub fn users(&self) -> UsersApi<'_, C> {
        UsersApi::new(&self.http)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.http.session()
    }

    pub fn http(&self) -> &C {
        &self.http
    }
}
