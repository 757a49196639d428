//! Client configuration

use std::time::Duration;

/// Environment variable holding the backend base URL
pub const API_BASE_URL_ENV: &str = "PAYDESK_API_BASE_URL";

/// Backend used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Client configuration for connecting to the PayDesk backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8000/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Serve mock data when the backend is unavailable
    pub fallback: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            fallback: true,
        }
    }

    /// Read the base URL from `PAYDESK_API_BASE_URL`
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Enable or disable the mock fallback
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://api.test")
            .with_timeout(5)
            .with_fallback(false);
        assert_eq!(config.base_url, "http://api.test");
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert!(!config.fallback);
    }

    #[test]
    fn test_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, 30);
        assert!(config.fallback);
    }
}
