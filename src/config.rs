// Client configuration.
// Endpoint, API key, version, timeout and TTL policy, loaded from the environment and validated.

use std::time::Duration;

use url::Url;

use crate::cache::TtlPolicy;
use crate::ckan::transport::DEFAULT_TIMEOUT;
use crate::error::{CkanError, Result};

/// Default CKAN action API version.
pub const DEFAULT_API_VERSION: u32 = 3;

pub const ENV_ENDPOINT_URL: &str = "CKAN_ENDPOINT_URL";
pub const ENV_API_KEY: &str = "CKAN_API_KEY";
pub const ENV_API_VERSION: &str = "CKAN_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "CKAN_TIMEOUT_SECS";

/// Settings for one CKAN endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint base URL, e.g. `https://data.gov.au` (no trailing slash).
    pub endpoint_url: String,
    pub api_key: Option<String>,
    pub api_version: u32,
    /// Bound on each HTTP request.
    pub timeout: Duration,
    pub ttl: TtlPolicy,
}

impl ClientConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_key: None,
            api_version: DEFAULT_API_VERSION,
            timeout: DEFAULT_TIMEOUT,
            ttl: TtlPolicy::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ttl(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }

    /// Load from `CKAN_ENDPOINT_URL`, `CKAN_API_KEY`, `CKAN_API_VERSION` and `CKAN_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint_url = get(ENV_ENDPOINT_URL).ok_or(CkanError::MissingEndpoint)?;
        let mut config = Self::new(endpoint_url);

        config.api_key = get(ENV_API_KEY);

        if let Some(version) = get(ENV_API_VERSION) {
            config.api_version = version.trim().parse().map_err(|_| {
                CkanError::Config(format!("{} must be a number, got '{}'", ENV_API_VERSION, version))
            })?;
        }

        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                CkanError::Config(format!("{} must be a number, got '{}'", ENV_TIMEOUT_SECS, secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Check the settings and return a normalized copy.
    ///
    /// The endpoint must be an absolute http(s) URL without a query or
    /// fragment; a trailing slash is stripped. An API key is only sent over HTTPS.
    pub fn validate(&self) -> Result<Self> {
        let trimmed = self.endpoint_url.trim();
        let url = Url::parse(trimmed).map_err(|e| CkanError::InvalidUrl {
            url: self.endpoint_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(CkanError::InvalidUrl {
                url: self.endpoint_url.clone(),
                reason: "endpoint must be an http or https URL".to_string(),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(CkanError::InvalidUrl {
                url: self.endpoint_url.clone(),
                reason: "endpoint must not carry a query or fragment".to_string(),
            });
        }

        if self.api_key.is_some() && url.scheme() != "https" {
            return Err(CkanError::Config(
                "if using an API key, the endpoint URL must use HTTPS".to_string(),
            ));
        }

        if self.api_version == 0 {
            return Err(CkanError::Config("API version must be at least 1".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(CkanError::Config("timeout must be greater than zero".to_string()));
        }

        let mut normalized = self.clone();
        normalized.endpoint_url = trimmed.trim_end_matches('/').to_string();
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("https://data.gov.au");
        assert_eq!(config.api_version, 3);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.api_key.is_none());
        assert_eq!(config.ttl, TtlPolicy::default());
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_URL, "https://data.gov.au"),
            (ENV_API_KEY, "abc-123"),
            (ENV_API_VERSION, "2"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint_url, "https://data.gov.au");
        assert_eq!(config.api_key.as_deref(), Some("abc-123"));
        assert_eq!(config.api_version, 2);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_requires_endpoint() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "abc")])).unwrap_err();
        assert!(matches!(err, CkanError::MissingEndpoint));
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_URL, "http://data.gov.au"),
            (ENV_API_KEY, "  "),
        ]))
        .unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_bad_version_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_URL, "http://data.gov.au"),
            (ENV_API_VERSION, "three"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CkanError::Config(_)));
    }

    #[test]
    fn test_validate_strips_trailing_slash() {
        let config = ClientConfig::new("https://data.gov.au/").validate().unwrap();
        assert_eq!(config.endpoint_url, "https://data.gov.au");

        let nested = ClientConfig::new("https://example.org/catalog//").validate().unwrap();
        assert_eq!(nested.endpoint_url, "https://example.org/catalog");
    }

    #[test]
    fn test_validate_rejects_invalid_url() {
        assert!(matches!(
            ClientConfig::new("not a url").validate().unwrap_err(),
            CkanError::InvalidUrl { .. }
        ));
        assert!(matches!(
            ClientConfig::new("ftp://data.gov.au").validate().unwrap_err(),
            CkanError::InvalidUrl { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_query_and_fragment() {
        for endpoint in ["https://data.gov.au?x=1", "https://data.gov.au/#top"] {
            assert!(matches!(
                ClientConfig::new(endpoint).validate().unwrap_err(),
                CkanError::InvalidUrl { .. }
            ));
        }
    }

    #[test]
    fn test_validate_requires_https_with_api_key() {
        let err = ClientConfig::new("http://data.gov.au")
            .with_api_key("secret")
            .validate()
            .unwrap_err();
        assert!(matches!(err, CkanError::Config(_)));

        assert!(
            ClientConfig::new("https://data.gov.au")
                .with_api_key("secret")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = ClientConfig::new("https://data.gov.au")
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CkanError::Config(_)));
    }
}
