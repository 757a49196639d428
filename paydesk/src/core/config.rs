use std::path::PathBuf;

use paydesk_client::ClientConfig;
use paydesk_client::config::{API_BASE_URL_ENV, DEFAULT_BASE_URL};

/// Application configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PAYDESK_API_BASE_URL | http://localhost:8000/api | Backend base URL |
/// | PAYDESK_DATA_DIR | .paydesk | Session storage directory |
/// | PAYDESK_LOG_LEVEL | info | Default log filter |
/// | PAYDESK_LOG_DIR | (unset) | Daily rolling log file directory |
/// | PAYDESK_MOCK_FALLBACK | true | Serve mock data when the backend is down |
/// | PAYDESK_TIMEOUT_SECS | 30 | HTTP timeout |
///
/// A `.env` file in the working directory is loaded first.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub fallback: bool,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Load from the environment (and `.env`)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_vars()
    }

    /// Environment only, without touching `.env`
    pub fn from_vars() -> Self {
        Self {
            api_base_url: std::env::var(API_BASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            data_dir: std::env::var("PAYDESK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".paydesk")),
            log_level: std::env::var("PAYDESK_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("PAYDESK_LOG_DIR").ok().map(PathBuf::from),
            fallback: std::env::var("PAYDESK_MOCK_FALLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            timeout_secs: std::env::var("PAYDESK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Directory holding the `auth_token` / `user` files
    pub fn session_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.clone())
            .with_timeout(self.timeout_secs)
            .with_fallback(self.fallback)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_vars()
    }
}
