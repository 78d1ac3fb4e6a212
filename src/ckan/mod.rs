// CKAN API module.
// URL building, transport, classification and the cached fetch pipeline for CKAN endpoints.

pub mod classify;
pub mod client;
pub mod endpoints;
pub mod fetch;
pub mod transport;
pub mod types;
pub mod url;

pub use classify::{Classification, classify};
pub use client::CkanClient;
pub use endpoints::{CkanService, ConnectionStatus};
pub use fetch::Fetcher;
pub use transport::{RawResponse, ReqwestTransport, Transport};
pub use types::*;
pub use self::url::{build_url, raw_url};
