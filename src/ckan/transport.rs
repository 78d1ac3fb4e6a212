// HTTP transport abstraction.
// The fetch pipeline talks to a Transport; the reqwest implementation is used in production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderValue},
};

use crate::error::{CkanError, Result};

/// Default bound on a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CLIENT_USER_AGENT: &str = concat!("ckan-client/", env!("CARGO_PKG_VERSION"));

/// Raw HTTP response as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase for the status, if known.
    pub reason: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        Self {
            status,
            reason,
            body: body.into(),
        }
    }
}

/// Issues a single GET request. Any error means no HTTP response was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, api_key: Option<&str>) -> Result<RawResponse>;
}

/// Transport backed by a reqwest client with a request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .map_err(CkanError::Transport)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, api_key: Option<&str>) -> Result<RawResponse> {
        let mut request = self.client.get(url);

        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| CkanError::InvalidHeader(format!("{}: {}", AUTHORIZATION, e)))?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body: body.to_vec(),
        })
    }
}
