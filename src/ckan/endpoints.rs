// CKAN catalog actions.
// Typed wrappers for datastore search, resource metadata and endpoint connection checks.

use url::Url;

use super::client::{CkanClient, DEFAULT_TEST_RESOURCE};
use super::types::{ApiResponse, Query};

pub const ACTION_DATASTORE_SEARCH: &str = "action/datastore_search";
pub const ACTION_RESOURCE_SHOW: &str = "action/resource_show";
pub const ACTION_TEST_HTTP: &str = DEFAULT_TEST_RESOURCE;
pub const ACTION_TEST_HTTPS: &str = "action/dashboard_activity_list";

/// How an endpoint answered a connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    /// HTTP 403: the API key was refused.
    Unauthorized,
    /// Anything else; 0 when no response arrived.
    Unreachable { status_code: u16, message: String },
}

impl ConnectionStatus {
    pub fn from_response(response: &ApiResponse) -> Self {
        match response.status_code {
            200 if response.valid => ConnectionStatus::Connected,
            403 => ConnectionStatus::Unauthorized,
            code => ConnectionStatus::Unreachable {
                status_code: code,
                message: response.status_message.clone(),
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn display(&self) -> String {
        match self {
            ConnectionStatus::Connected => "Connected".to_string(),
            ConnectionStatus::Unauthorized => {
                "API returned \"Not Authorised\", please check your API key".to_string()
            }
            ConnectionStatus::Unreachable {
                status_code,
                message,
            } => format!(
                "Could not establish a connection to the endpoint. Error: {} ({})",
                status_code, message
            ),
        }
    }
}

/// Catalog operations on top of a [`CkanClient`].
#[derive(Clone)]
pub struct CkanService {
    client: CkanClient,
}

impl CkanService {
    pub fn new(client: CkanClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CkanClient {
        &self.client
    }

    pub fn set_client(&mut self, client: CkanClient) {
        self.client = client;
    }

    /// Search datastore records of a resource.
    ///
    /// `search` becomes `q` and `filters` is passed through as given; empty values are omitted.
    pub async fn request_records(
        &self,
        resource_id: &str,
        search: Option<&str>,
        filters: Option<&str>,
    ) -> ApiResponse {
        let mut query = Query::from([("id", resource_id)]);

        if let Some(q) = search.filter(|s| !s.is_empty()) {
            query.insert("q", q);
        }
        if let Some(f) = filters.filter(|s| !s.is_empty()) {
            query.insert("filters", f);
        }

        self.client.get(ACTION_DATASTORE_SEARCH, query).await
    }

    /// Fetch the metadata of a resource.
    pub async fn request_meta(&self, resource_id: &str) -> ApiResponse {
        self.client
            .get(ACTION_RESOURCE_SHOW, Query::from([("id", resource_id)]))
            .await
    }

    /// Test the configured endpoint.
    pub async fn test_connection(&self) -> ApiResponse {
        self.client.test_connection_default().await
    }

    /// Test another endpoint without changing the configured one.
    ///
    /// HTTPS endpoints are checked with an action that needs a valid key.
    pub async fn test_endpoint(&self, endpoint_url: &str) -> ApiResponse {
        let resource = test_action_for(endpoint_url);
        self.client
            .with_base_url(endpoint_url)
            .test_connection(resource, Query::from([("limit", "1")]))
            .await
    }
}

/// Pick the connection-test action by URL scheme.
pub fn test_action_for(endpoint_url: &str) -> &'static str {
    match Url::parse(endpoint_url) {
        Ok(url) if url.scheme() == "https" => ACTION_TEST_HTTPS,
        _ => ACTION_TEST_HTTP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn response(valid: bool, status_code: u16) -> ApiResponse {
        ApiResponse {
            valid,
            request_time: Utc::now(),
            status_code,
            status_message: "msg".to_string(),
            url: String::new(),
            resource: ACTION_TEST_HTTP.to_string(),
            query: Query::new(),
            data: None,
        }
    }

    #[test]
    fn test_action_by_scheme() {
        assert_eq!(test_action_for("https://data.gov.au"), ACTION_TEST_HTTPS);
        assert_eq!(test_action_for("http://data.gov.au"), ACTION_TEST_HTTP);
        assert_eq!(test_action_for("garbage"), ACTION_TEST_HTTP);
    }

    #[test]
    fn test_connection_status() {
        assert_eq!(
            ConnectionStatus::from_response(&response(true, 200)),
            ConnectionStatus::Connected
        );
        assert_eq!(
            ConnectionStatus::from_response(&response(false, 403)),
            ConnectionStatus::Unauthorized
        );
        assert!(matches!(
            ConnectionStatus::from_response(&response(false, 200)),
            ConnectionStatus::Unreachable { status_code: 200, .. }
        ));
        assert!(matches!(
            ConnectionStatus::from_response(&response(false, 0)),
            ConnectionStatus::Unreachable { status_code: 0, .. }
        ));
    }

    #[test]
    fn test_status_display() {
        assert!(ConnectionStatus::Unauthorized.display().contains("API key"));
        let unreachable = ConnectionStatus::Unreachable {
            status_code: 502,
            message: "HTTP 502 Bad Gateway".to_string(),
        };
        assert!(unreachable.display().contains("502"));
        assert!(!unreachable.is_connected());
    }
}
