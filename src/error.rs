// Error types for the CKAN client.
// Covers URL building, transport, upstream envelope, cache backend and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CkanError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("HTTP {code} {reason}")]
    UpstreamHttp { code: u16, reason: String },

    #[error("CKAN request failed: {0}")]
    UpstreamEnvelope(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing CKAN_ENDPOINT_URL environment variable")]
    MissingEndpoint,
}

pub type Result<T> = std::result::Result<T, CkanError>;
