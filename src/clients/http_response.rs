//! HTTP response types for the Kloudless client.

use std::collections::HashMap;

/// An HTTP response from the Kloudless API.
///
/// Holds the status code, the headers, the body parsed as JSON and the raw
/// body bytes. File downloads read `bytes`; everything else reads `body`.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body, or `Value::Null` for non-JSON bodies.
    pub body: serde_json::Value,
    /// The raw response body.
    pub bytes: Vec<u8>,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` from a JSON body.
    ///
    /// `bytes` is filled with the serialized body.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let bytes = if body.is_null() {
            Vec::new()
        } else {
            body.to_string().into_bytes()
        };
        Self::with_bytes(code, headers, body, bytes)
    }

    /// Creates a new `HttpResponse` keeping the raw body bytes as received.
    #[must_use]
    pub fn with_bytes(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
        bytes: Vec<u8>,
    ) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            bytes,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header value, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the request id for error reports.
    ///
    /// Prefers the `X-Request-Id` header and falls back to the `id` field of a
    /// Kloudless error body.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id").or_else(|| {
            if self.is_ok() {
                None
            } else {
                self.body.get("id").and_then(serde_json::Value::as_str)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 403, 404, 422, 429, 500, 503] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(!response.is_ok());
        }
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["2.5".to_string()]);

        let response = HttpResponse::new(429, headers, json!({}));
        assert!((response.retry_request_after.unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_request_id_prefers_header() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["hdr-1".to_string()]);

        let response = HttpResponse::new(404, headers, json!({"id": "body-1"}));
        assert_eq!(response.request_id(), Some("hdr-1"));
    }

    #[test]
    fn test_request_id_falls_back_to_error_body() {
        let response = HttpResponse::new(404, HashMap::new(), json!({"id": "body-1"}));
        assert_eq!(response.request_id(), Some("body-1"));

        // A successful resource body's id is the resource id, not a request id.
        let response = HttpResponse::new(200, HashMap::new(), json!({"id": "file-1"}));
        assert_eq!(response.request_id(), None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/octet-stream".to_string()],
        );
        let response = HttpResponse::with_bytes(200, headers, json!(null), vec![0, 1, 2]);
        assert_eq!(response.content_type(), Some("application/octet-stream"));
        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(response.bytes, vec![0, 1, 2]);
    }
}
