//! PayDesk Client - HTTP client for the PayDesk backend
//!
//! Provides the session store, the network transport, typed API groups and
//! the explicit mock fallback used when the backend is unreachable.

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod session;

pub use api::{ApiClient, AuthApi, RequestsApi, UsersApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use fallback::{MockBackend, OfflineClient, Origin, Served};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{FileStore, KeyValueStore, MemoryStore, Session, SessionStore};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, ReviewRequest};
