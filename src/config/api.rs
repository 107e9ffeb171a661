//! Plan API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Connection settings for the external plan API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.example.com/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<Secret<String>>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn has_token(&self) -> bool {
        self.api_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidApiUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            api_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.has_token());
    }

    #[test]
    fn rejects_non_http_url() {
        let config = ApiConfig {
            base_url: "ftp://plans".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidApiUrl(_))
        ));
    }

    #[test]
    fn rejects_zero_and_excessive_timeouts() {
        for timeout_secs in [0, 301] {
            let config = ApiConfig {
                timeout_secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = ApiConfig {
            base_url: "https://plans.example.com/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://plans.example.com/v1");
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let config = ApiConfig {
            api_token: Some(Secret::new("tok_live_123".to_string())),
            ..Default::default()
        };
        assert!(config.has_token());
        assert!(!format!("{:?}", config).contains("tok_live_123"));
    }
}
