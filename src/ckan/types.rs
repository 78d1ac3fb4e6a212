// CKAN request and response types.
// Defines the ordered query, request descriptor, canonical result and JSON envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered set of query parameters.
///
/// Insertion order is kept so that the encoded URL, and therefore its cache
/// fingerprint, is stable for logically identical requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`Query::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Query {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (k, v) in iter {
            query.insert(k, v);
        }
        query
    }
}

/// Everything needed to issue one request. Borrowed immutably for the whole fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub base_url: String,
    pub api_version: u32,
    pub resource: String,
    pub query: Query,
    pub api_key: Option<String>,
}

/// Standardised result of a CKAN request, valid or not.
///
/// This is the only value handed back to callers and the only value cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Transport succeeded and the envelope reported success.
    pub valid: bool,
    pub request_time: DateTime<Utc>,
    /// HTTP status code, 0 when no response was received.
    pub status_code: u16,
    pub status_message: String,
    pub url: String,
    pub resource: String,
    pub query: Query,
    /// The envelope's `result`; only present when `valid`.
    pub data: Option<Value>,
}

impl ApiResponse {
    /// A result for a request that never produced an HTTP response.
    ///
    /// `request_time` is when the attempt started, not when it gave up.
    pub fn failed(
        request: &ApiRequest,
        url: String,
        request_time: DateTime<Utc>,
        status_message: impl Into<String>,
    ) -> Self {
        Self {
            valid: false,
            request_time,
            status_code: 0,
            status_message: status_message.into(),
            url,
            resource: request.resource.clone(),
            query: request.query.clone(),
            data: None,
        }
    }
}

/// CKAN's JSON wrapper around every action response.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

/// Error details CKAN attaches when `success` is false.
#[derive(Debug, Deserialize)]
pub struct EnvelopeError {
    pub message: Option<String>,
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
}

impl EnvelopeError {
    pub fn describe(&self) -> String {
        match (&self.error_type, &self.message) {
            (Some(kind), Some(message)) => format!("{}: {}", kind, message),
            (Some(kind), None) => kind.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}
