// Request URL construction.
// Joins the endpoint, versioned API path and resource, then appends the query in order.

use url::Url;

use crate::error::{CkanError, Result};

use super::types::Query;

/// Versioned API path segment, e.g. `/api/3/`.
pub fn api_path(api_version: u32) -> String {
    format!("/api/{}/", api_version)
}

/// The request URL before validation and query encoding.
///
/// Used for diagnostics when the endpoint cannot be parsed.
pub fn raw_url(base_url: &str, api_version: u32, resource: &str) -> String {
    format!("{}{}{}", base_url, api_path(api_version), resource)
}

/// Build the fully qualified request URL.
///
/// No trailing-slash normalization is applied to `base_url`; query pairs are
/// encoded in insertion order so equal requests always produce equal strings.
pub fn build_url(base_url: &str, api_version: u32, resource: &str, query: &Query) -> Result<String> {
    if base_url.trim().is_empty() {
        return Err(CkanError::InvalidUrl {
            url: base_url.to_string(),
            reason: "endpoint URL is empty".to_string(),
        });
    }

    let base = Url::parse(base_url).map_err(|e| CkanError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
        return Err(CkanError::InvalidUrl {
            url: base_url.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }

    let joined = raw_url(base_url, api_version, resource);
    let mut url = Url::parse(&joined).map_err(|e| CkanError::InvalidUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query.iter() {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_package_show_url() {
        let query = Query::from([("id", "abc")]);
        let url = build_url("http://data.gov.au", 3, "action/package_show", &query).unwrap();
        assert_eq!(url, "http://data.gov.au/api/3/action/package_show?id=abc");
    }

    #[test]
    fn test_build_url_without_query() {
        let url = build_url("https://demo.ckan.org", 3, "action/package_list", &Query::new()).unwrap();
        assert_eq!(url, "https://demo.ckan.org/api/3/action/package_list");
    }

    #[test]
    fn test_query_order_is_preserved() {
        let query = Query::from([("limit", "5"), ("id", "xyz"), ("q", "water quality")]);
        let url = build_url("http://data.gov.au", 3, "action/datastore_search", &query).unwrap();
        assert_eq!(
            url,
            "http://data.gov.au/api/3/action/datastore_search?limit=5&id=xyz&q=water+quality"
        );

        let reordered = Query::from([("id", "xyz"), ("limit", "5"), ("q", "water quality")]);
        let other = build_url("http://data.gov.au", 3, "action/datastore_search", &reordered).unwrap();
        assert_ne!(url, other);
    }

    #[test]
    fn test_build_url_is_deterministic() {
        let query = Query::from([("id", "abc"), ("filters", "{\"year\":2020}")]);
        let a = build_url("http://data.gov.au", 3, "action/datastore_search", &query).unwrap();
        let b = build_url("http://data.gov.au", 3, "action/datastore_search", &query.clone()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_api_version_is_templated() {
        let url = build_url("http://data.gov.au", 1, "action/package_list", &Query::new()).unwrap();
        assert_eq!(url, "http://data.gov.au/api/1/action/package_list");
    }

    #[test]
    fn test_trailing_slash_is_not_normalized() {
        let url = build_url("http://data.gov.au/", 3, "test", &Query::new()).unwrap();
        assert_eq!(url, "http://data.gov.au//api/3/test");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let err = build_url("", 3, "action/package_list", &Query::new()).unwrap_err();
        assert!(matches!(err, CkanError::InvalidUrl { .. }));
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        let err = build_url("data.gov.au", 3, "action/package_list", &Query::new()).unwrap_err();
        assert!(matches!(err, CkanError::InvalidUrl { .. }));
    }

    #[test]
    fn test_non_hierarchical_base_url_is_rejected() {
        let err = build_url("mailto:admin@data.gov.au", 3, "x", &Query::new()).unwrap_err();
        assert!(matches!(err, CkanError::InvalidUrl { .. }));
    }

    #[test]
    fn test_raw_url() {
        assert_eq!(raw_url("nope", 3, "action/x"), "nope/api/3/action/x");
    }
}
