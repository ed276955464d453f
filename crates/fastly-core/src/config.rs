//! Configuration structures for Fastly clients.
//!
//! [`FastlyClientConfig`] carries everything needed to build one of the
//! service clients: endpoint, credentials, timeouts, retries and the page size
//! used when following every page of a list.

use crate::error::Error;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::types::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the API token.
pub const API_KEY_ENV: &str = "FASTLY_API_KEY";

/// Environment variable overriding the API endpoint.
pub const API_URL_ENV: &str = "FASTLY_API_URL";

/// Configuration for a Fastly client instance.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct FastlyClientConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API token, sent as `Fastly-Key`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for idempotent requests
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Page size used when fetching every page of a list
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl FastlyClientConfig {
    /// Create a new client configuration for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            ..Self::default()
        };

        config.validate().map_err(|e| {
            Error::ConfigError(format!("Invalid configuration: {e}"))
        })?;

        Ok(config)
    }

    /// Build a configuration from `FASTLY_API_URL` and `FASTLY_API_KEY`.
    ///
    /// Both variables are optional; the default endpoint is used when the URL is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `FASTLY_API_URL` is set to an invalid URL.
    pub fn from_env() -> Result<Self, Error> {
        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(default_api_url);
        let mut config = Self::new(api_url)?;
        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        Ok(config)
    }

    /// Set the API token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the page size used when fetching every page of a list.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_url)
            .map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))
    }
}

impl Default for FastlyClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            page_size: default_page_size(),
        }
    }
}

impl std::fmt::Debug for FastlyClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastlyClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("tls_verify", &self.tls_verify)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = FastlyClientConfig::new("https://api.fastly.com").unwrap();
        assert_eq!(config.api_url, "https://api.fastly.com");
        assert!(config.api_key.is_none());
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_config_invalid_url() {
        let result = FastlyClientConfig::new("not a url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = FastlyClientConfig::default()
            .with_api_key("token")
            .with_tls_verify(false)
            .with_timeout(60)
            .with_max_retries(5)
            .with_page_size(100);

        assert_eq!(config.api_key.as_deref(), Some("token"));
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_config_validation_rejects_zero_page_size() {
        let config = FastlyClientConfig::default().with_page_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserialize_applies_defaults() {
        let config: FastlyClientConfig =
            serde_json::from_str(r#"{"api_key": "abc", "page_size": 50}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_never_serializes_api_key() {
        let config = FastlyClientConfig::default().with_api_key("super-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_parse_api_url() {
        let config = FastlyClientConfig::default();
        let url = config.parse_api_url().unwrap();
        assert_eq!(url.host_str(), Some("api.fastly.com"));
    }
}
