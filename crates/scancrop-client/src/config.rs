//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Base address used when `IMAGE_API_BASE` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// What to do with a response whose HTTP status is not 2xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Decode the body anyway and hand it back as a normal reply.
    #[default]
    PassThrough,
    /// Turn the response into `ApiError::Status`.
    Strict,
}

/// Configuration for the image API client.
#[derive(Debug, Clone)]
pub struct ImageApiConfig {
    /// Root URL of the image service, without trailing slash
    pub base_url: String,
    /// Whole-request timeout (none by default)
    pub timeout: Option<Duration>,
    /// Connect timeout (none by default)
    pub connect_timeout: Option<Duration>,
    /// Handling of non-success statuses
    pub status_policy: StatusPolicy,
}

impl Default for ImageApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            connect_timeout: None,
            status_policy: StatusPolicy::PassThrough,
        }
    }
}

impl ImageApiConfig {
    /// Create a config for the given base address.
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            ..Self::default()
        })
    }

    /// Create config from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        let base_url =
            std::env::var("IMAGE_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let status_policy = match std::env::var("IMAGE_API_STRICT_STATUS") {
            Ok(v) if matches!(v.to_lowercase().as_str(), "1" | "true" | "yes") => {
                StatusPolicy::Strict
            }
            _ => StatusPolicy::PassThrough,
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            timeout: secs_from_env("IMAGE_API_TIMEOUT_SECS"),
            connect_timeout: secs_from_env("IMAGE_API_CONNECT_TIMEOUT_SECS"),
            status_policy,
        })
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}

/// Validate an http(s) base address and strip trailing slashes.
pub(crate) fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| ApiError::config(format!("invalid base URL {:?}: {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ApiError::config(format!(
            "base URL must use http or https, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "IMAGE_API_BASE",
            "IMAGE_API_TIMEOUT_SECS",
            "IMAGE_API_CONNECT_TIMEOUT_SECS",
            "IMAGE_API_STRICT_STATUS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ImageApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, None);
        assert_eq!(config.status_policy, StatusPolicy::PassThrough);
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let config = ImageApiConfig::new("https://images.example.com/api/").unwrap();
        assert_eq!(config.base_url, "https://images.example.com/api");
    }

    #[test]
    fn test_builder_helpers() {
        let config = ImageApiConfig::new("http://localhost:9000")
            .unwrap()
            .with_timeout(Duration::from_secs(10))
            .with_status_policy(StatusPolicy::Strict);
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.status_policy, StatusPolicy::Strict);
    }

    #[test]
    fn test_new_rejects_bad_urls() {
        assert!(matches!(
            ImageApiConfig::new("not a url"),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ImageApiConfig::new("ftp://example.com"),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ImageApiConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.status_policy, StatusPolicy::PassThrough);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("IMAGE_API_BASE", "http://10.0.0.5:9000/");
        std::env::set_var("IMAGE_API_TIMEOUT_SECS", "30");
        std::env::set_var("IMAGE_API_CONNECT_TIMEOUT_SECS", "nope");
        std::env::set_var("IMAGE_API_STRICT_STATUS", "TRUE");

        let config = ImageApiConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.status_policy, StatusPolicy::Strict);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_base() {
        clear_env();
        std::env::set_var("IMAGE_API_BASE", "localhost");
        let result = ImageApiConfig::from_env();
        clear_env();
        assert!(result.is_err());
    }
}
