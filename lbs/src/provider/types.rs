//! Core provider trait and error type.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use super::http::HttpClient;
use super::params::Params;

/// Errors returned by provider clients.
///
/// Every provider's JSON error envelope is normalized into [`ApiError`],
/// so callers handle one shape regardless of which service answered.
///
/// [`ApiError`]: ProviderError::ApiError
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response body was not the JSON the endpoint documents.
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// The provider answered with an error status in its envelope.
    #[error("{provider} API error {code}: {message}")]
    ApiError {
        provider: String,
        code: String,
        message: String,
    },

    /// A request argument was rejected before sending.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A REST map service reached through an [`HttpClient`].
///
/// Implementors supply the base URL, the credential parameters and the
/// envelope check; request dispatch, JSON decoding and logging are shared.
pub trait Provider {
    type Http: HttpClient;

    /// Human-readable provider name, used in logs and errors.
    fn name(&self) -> &str;

    /// Base URL that endpoint paths are joined onto.
    fn base_url(&self) -> &str;

    fn http_client(&self) -> &Self::Http;

    /// Adds the provider's key (and signature, if any) to outgoing parameters.
    fn authorize(&self, params: &mut Params);

    /// Rejects responses whose envelope reports a failure.
    fn check_envelope(&self, body: &Value) -> Result<(), ProviderError>;

    /// Builds the full authorized URL for `path` without sending anything.
    fn signed_url(&self, path: &str, mut params: Params) -> Result<String, ProviderError> {
        self.authorize(&mut params);
        params.to_url(self.base_url(), path)
    }

    /// Performs a GET and returns the checked JSON body.
    fn get_json(&self, path: &str, params: Params) -> Result<Value, ProviderError> {
        let url = self.signed_url(path, params)?;
        debug!(provider = self.name(), url = %url, "GET");

        let body = self.http_client().get(&url).map_err(|e| {
            error!(provider = self.name(), url = %url, error = %e, "Request failed");
            e
        })?;
        self.handle_body(&url, &body)
    }

    /// Performs a POST with a JSON body and returns the checked JSON response.
    fn post_json(&self, path: &str, params: Params, body: &Value) -> Result<Value, ProviderError> {
        let url = self.signed_url(path, params)?;
        debug!(provider = self.name(), url = %url, body = %body, "POST");

        let response = self.http_client().post_json(&url, body).map_err(|e| {
            error!(provider = self.name(), url = %url, error = %e, "Request failed");
            e
        })?;
        self.handle_body(&url, &response)
    }

    #[doc(hidden)]
    fn handle_body(&self, url: &str, body: &[u8]) -> Result<Value, ProviderError> {
        let value = decode_json(body)?;
        if let Err(e) = self.check_envelope(&value) {
            error!(provider = self.name(), url = %url, error = %e, "Provider returned an error");
            return Err(e);
        }
        debug!(provider = self.name(), url = %url, response = %value, "Response");
        Ok(value)
    }
}

/// Parses a response body as JSON.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; some provider
/// gateways emit GBK fragments in error pages.
pub fn decode_json(body: &[u8]) -> Result<Value, ProviderError> {
    let text = String::from_utf8_lossy(body);
    serde_json::from_str(&text).map_err(|e| ProviderError::DecodeError(e.to_string()))
}

/// Reads a status field that may be a JSON number or a numeric string.
pub(crate) fn status_code(body: &Value, field: &str) -> Option<i64> {
    match body.get(field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders a scalar JSON field as a string for error reporting.
pub(crate) fn field_text(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Moves a named field out of a response, failing if it is missing.
pub(crate) fn take_field(mut body: Value, field: &str) -> Result<Value, ProviderError> {
    body.get_mut(field)
        .map(Value::take)
        .ok_or_else(|| ProviderError::DecodeError(format!("missing field '{}'", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json() {
        let value = decode_json(br#"{"status":"1"}"#).unwrap();
        assert_eq!(value["status"], "1");
    }

    #[test]
    fn test_decode_json_rejects_html() {
        let result = decode_json(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(ProviderError::DecodeError(_))));
    }

    #[test]
    fn test_status_code_number_or_string() {
        assert_eq!(status_code(&json!({"status": 0}), "status"), Some(0));
        assert_eq!(status_code(&json!({"status": "1"}), "status"), Some(1));
        assert_eq!(status_code(&json!({"status": "ok"}), "status"), None);
        assert_eq!(status_code(&json!({}), "status"), None);
    }

    #[test]
    fn test_take_field() {
        let body = json!({"geocodes": [1, 2]});
        assert_eq!(take_field(body.clone(), "geocodes").unwrap(), json!([1, 2]));
        assert!(matches!(
            take_field(body, "regeocode"),
            Err(ProviderError::DecodeError(_))
        ));
    }

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::ApiError {
            provider: "Amap".to_string(),
            code: "10001".to_string(),
            message: "INVALID_USER_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "Amap API error 10001: INVALID_USER_KEY");
    }
}
