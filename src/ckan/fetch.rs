// Fetch orchestration.
// Resolves the URL, consults the cache, performs at most one GET and stores the result by outcome.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::cache::{CacheStore, TtlPolicy, fingerprint};

use super::classify::classify;
use super::transport::Transport;
use super::types::{ApiRequest, ApiResponse};
use super::url::{build_url, raw_url};

/// Shared fetch/cache machinery behind every client.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheStore>,
    ttl: TtlPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<dyn CacheStore>, ttl: TtlPolicy) -> Self {
        Self {
            transport,
            cache,
            ttl,
        }
    }

    pub fn ttl(&self) -> TtlPolicy {
        self.ttl
    }

    /// Fetch a request, serving and populating the cache when `use_cache` is set.
    ///
    /// Never fails: every error is folded into an invalid [`ApiResponse`].
    /// A cached failure is served like any other entry until its TTL lapses.
    pub async fn fetch(&self, request: &ApiRequest, use_cache: bool) -> ApiResponse {
        let url = match build_url(
            &request.base_url,
            request.api_version,
            &request.resource,
            &request.query,
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    resource = %request.resource,
                    query = ?request.query,
                    error = %e,
                    "could not build CKAN request URL"
                );
                let url = raw_url(&request.base_url, request.api_version, &request.resource);
                return ApiResponse::failed(request, url, Utc::now(), e.to_string());
            }
        };

        let key = fingerprint(&url);

        if use_cache {
            match self.cache.get(&key) {
                Ok(Some(cached)) => {
                    debug!(%url, valid = cached.valid, "cache hit");
                    return cached;
                }
                Ok(None) => debug!(%url, "cache miss"),
                Err(e) => warn!(%url, error = %e, "cache read failed, fetching"),
            }
        }

        let response = self.fetch_uncached(request, url).await;

        if !response.valid {
            error!(
                url = %response.url,
                status_code = response.status_code,
                status_message = %response.status_message,
                "error requesting data from CKAN endpoint"
            );
        }

        if use_cache {
            let ttl = self.ttl.ttl_for(&response);
            match self.cache.set(&key, &response, ttl) {
                Ok(()) => debug!(url = %response.url, ttl_secs = ttl.as_secs(), "cached response"),
                Err(e) => warn!(url = %response.url, error = %e, "cache write failed"),
            }
        }

        response
    }

    async fn fetch_uncached(&self, request: &ApiRequest, url: String) -> ApiResponse {
        let request_time = Utc::now();

        let raw = match self.transport.get(&url, request.api_key.as_deref()).await {
            Ok(raw) => raw,
            Err(e) => return ApiResponse::failed(request, url, request_time, e.to_string()),
        };

        let classification = classify(&raw);
        ApiResponse {
            valid: classification.valid,
            request_time,
            status_code: raw.status,
            status_message: classification.status_message,
            url,
            resource: request.resource.clone(),
            query: request.query.clone(),
            data: classification.data,
        }
    }
}
