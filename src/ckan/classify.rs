// Response classification.
// A CKAN response is valid only when the HTTP status is 200 AND the envelope reports success.

use serde_json::Value;

use crate::error::{CkanError, Result};

use super::transport::RawResponse;
use super::types::Envelope;

/// Outcome of inspecting one HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub valid: bool,
    pub status_message: String,
    /// Present only when `valid`.
    pub data: Option<Value>,
}

/// Classify a response using both the HTTP status and CKAN's own success flag.
///
/// A 200 status is not enough: CKAN reports action failures inside the body.
pub fn classify(response: &RawResponse) -> Classification {
    match extract_result(response) {
        Ok(data) => Classification {
            valid: true,
            status_message: response.reason.clone(),
            data: Some(data),
        },
        Err(e) => Classification {
            valid: false,
            status_message: e.to_string(),
            data: None,
        },
    }
}

/// Decode the envelope and return its `result`, or the reason it is unusable.
pub fn extract_result(response: &RawResponse) -> Result<Value> {
    if response.status != 200 {
        return Err(CkanError::UpstreamHttp {
            code: response.status,
            reason: response.reason.clone(),
        });
    }

    let envelope: Envelope = serde_json::from_slice(&response.body)
        .map_err(|e| CkanError::UpstreamEnvelope(format!("malformed response body: {}", e)))?;

    if !envelope.success {
        let detail = envelope
            .error
            .map(|e| e.describe())
            .unwrap_or_else(|| "success flag was false".to_string());
        return Err(CkanError::UpstreamEnvelope(detail));
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_is_valid() {
        let response = RawResponse::new(200, r#"{"success": true, "result": [1, 2, 3]}"#);
        let classification = classify(&response);

        assert!(classification.valid);
        assert_eq!(classification.status_message, "OK");
        assert_eq!(classification.data, Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_http_200_with_failed_envelope_is_invalid() {
        let response = RawResponse::new(
            200,
            r#"{"success": false, "result": {"id": "abc"}, "error": {"message": "Access denied"}}"#,
        );
        let classification = classify(&response);

        assert!(!classification.valid);
        assert!(classification.data.is_none());
        assert!(classification.status_message.contains("Access denied"));
    }

    #[test]
    fn test_failed_envelope_without_error_details() {
        let response = RawResponse::new(200, r#"{"success": false}"#);
        let classification = classify(&response);

        assert!(!classification.valid);
        assert!(classification.status_message.contains("success flag was false"));
    }

    #[test]
    fn test_non_200_is_invalid_even_with_success_body() {
        let response = RawResponse::new(403, r#"{"success": true, "result": []}"#);
        let classification = classify(&response);

        assert!(!classification.valid);
        assert!(classification.data.is_none());
        assert_eq!(classification.status_message, "HTTP 403 Forbidden");
    }

    #[test]
    fn test_malformed_body_is_invalid() {
        let response = RawResponse::new(200, "<html>maintenance</html>");
        let classification = classify(&response);

        assert!(!classification.valid);
        assert!(classification.status_message.contains("malformed response body"));
    }

    #[test]
    fn test_missing_success_flag_is_invalid() {
        let response = RawResponse::new(200, r#"{"result": [1]}"#);
        assert!(!classify(&response).valid);
    }

    #[test]
    fn test_null_result_is_kept() {
        let response = RawResponse::new(200, r#"{"success": true, "result": null}"#);
        let classification = classify(&response);

        assert!(classification.valid);
        assert_eq!(classification.data, Some(Value::Null));
    }

    #[test]
    fn test_extract_result_error_kinds() {
        let http = extract_result(&RawResponse::new(500, "")).unwrap_err();
        assert!(matches!(http, CkanError::UpstreamHttp { code: 500, .. }));

        let envelope = extract_result(&RawResponse::new(200, "{}")).unwrap_err();
        assert!(matches!(envelope, CkanError::UpstreamEnvelope(_)));
    }
}
