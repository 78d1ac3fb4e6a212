//! Caching HTTP client for CKAN open-data catalog APIs.
//!
//! Requests are keyed by a fingerprint of their resolved URL. Successful
//! responses are cached for 30 days and failures for 1 day by default; a
//! response is only valid when HTTP 200 is returned *and* the CKAN envelope
//! reports `success: true`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use ckan_client::{CkanClient, ClientConfig, MemoryCache, Query};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://data.gov.au").validate()?;
//! let client = CkanClient::new(&config, Arc::new(MemoryCache::new()))?;
//!
//! let response = client
//!     .get("action/package_show", Query::from([("id", "fd49dc83f86f")]))
//!     .await;
//! if response.valid {
//!     println!("{}", response.data.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod ckan;
pub mod config;
pub mod error;

pub use cache::{CacheStore, FileCache, MemoryCache, TtlPolicy};
pub use ckan::{ApiRequest, ApiResponse, CkanClient, CkanService, ConnectionStatus, Query};
pub use config::ClientConfig;
pub use error::{CkanError, Result};
