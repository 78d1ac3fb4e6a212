// Cache store interface shared by every backend.
// Entries carry an absolute expiry; expired entries read as absent and are never purged implicitly.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ckan::ApiResponse;
use crate::error::{CkanError, Result};

/// TTL for successful responses: 30 days. Catalog data changes rarely.
pub const SUCCESS_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// TTL for failed responses: 1 day. Failures are retried sooner.
pub const FAILURE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Key/value store with per-entry expiry.
///
/// Implementations must be safe to share between tasks. `set` always
/// overwrites; the last writer wins.
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(None)` for a missing or expired key.
    fn get(&self, key: &str) -> Result<Option<ApiResponse>>;

    fn set(&self, key: &str, value: &ApiResponse, ttl: Duration) -> Result<()>;
}

/// A stored result with its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: ApiResponse,
    /// When the entry was written.
    pub cached_at: DateTime<Utc>,
    /// Reads at or after this instant treat the entry as absent.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: ApiResponse, ttl: Duration) -> Self {
        let cached_at = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = cached_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            value,
            cached_at,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The value, unless expired.
    pub fn into_fresh(self) -> Option<ApiResponse> {
        if self.is_expired() {
            None
        } else {
            Some(self.value)
        }
    }
}

/// Which TTL applies to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    success: Duration,
    failure: Duration,
}

impl TtlPolicy {
    /// Failures must not outlive successes.
    pub fn new(success: Duration, failure: Duration) -> Result<Self> {
        if failure > success {
            return Err(CkanError::Config(format!(
                "failure TTL ({}s) exceeds success TTL ({}s)",
                failure.as_secs(),
                success.as_secs()
            )));
        }
        Ok(Self { success, failure })
    }

    pub fn success(&self) -> Duration {
        self.success
    }

    pub fn failure(&self) -> Duration {
        self.failure
    }

    pub fn ttl_for(&self, response: &ApiResponse) -> Duration {
        if response.valid {
            self.success
        } else {
            self.failure
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            success: SUCCESS_TTL,
            failure: FAILURE_TTL,
        }
    }
}
