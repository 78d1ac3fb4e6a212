// CKAN API client facade.
// Holds endpoint settings and turns (resource, query) pairs into cached fetches.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::{ClientConfig, DEFAULT_API_VERSION};
use crate::error::Result;

use super::fetch::Fetcher;
use super::transport::{ReqwestTransport, Transport};
use super::types::{ApiRequest, ApiResponse, Query};

/// Action used by the default connection test.
pub const DEFAULT_TEST_RESOURCE: &str = "action/package_list";

/// CKAN client with a shared, injected cache.
///
/// Cloning is cheap; clones share transport and cache.
#[derive(Clone)]
pub struct CkanClient {
    base_url: String,
    api_key: Option<String>,
    api_version: u32,
    fetcher: Fetcher,
}

impl CkanClient {
    /// Create a client that talks HTTP through reqwest.
    pub fn new(config: &ClientConfig, cache: Arc<dyn CacheStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, cache, Arc::new(transport)))
    }

    /// Create a client with a caller-supplied transport.
    pub fn with_transport(
        config: &ClientConfig,
        cache: Arc<dyn CacheStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: config.endpoint_url.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version,
            fetcher: Fetcher::new(transport, cache, config.ttl),
        }
    }

    /// Set endpoint, key and version in one call.
    pub fn configure(&mut self, base_url: impl Into<String>, api_key: Option<String>, api_version: Option<u32>) {
        self.set_base_url(base_url);
        self.set_api_key(api_key);
        self.set_api_version(api_version.unwrap_or(DEFAULT_API_VERSION));
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = base_url.into();
        self
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) -> &mut Self {
        self.api_key = api_key;
        self
    }

    pub fn set_api_version(&mut self, api_version: u32) -> &mut Self {
        self.api_version = api_version;
        self
    }

    /// A client for another endpoint sharing this client's cache and transport.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.base_url = base_url.into();
        client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Describe a request against the current settings.
    pub fn request(&self, resource: &str, query: Query) -> ApiRequest {
        ApiRequest {
            base_url: self.base_url.clone(),
            api_version: self.api_version,
            resource: resource.to_string(),
            query,
            api_key: self.api_key.clone(),
        }
    }

    /// Fetch a resource, served from cache while the stored result is fresh.
    ///
    /// Callers must branch on `valid`; `data` is only set for valid results.
    pub async fn get(&self, resource: &str, query: Query) -> ApiResponse {
        let request = self.request(resource, query);
        self.fetcher.fetch(&request, true).await
    }

    /// Check that a resource answers, always going to the network.
    ///
    /// The payload is discarded; only validity and status are reported.
    pub async fn test_connection(&self, resource: &str, query: Query) -> ApiResponse {
        let request = self.request(resource, query);
        let mut response = self.fetcher.fetch(&request, false).await;
        response.data = None;
        response
    }

    /// Connection test against `action/package_list` with `limit=1`.
    pub async fn test_connection_default(&self) -> ApiResponse {
        self.test_connection(DEFAULT_TEST_RESOURCE, Query::from([("limit", "1")]))
            .await
    }
}
