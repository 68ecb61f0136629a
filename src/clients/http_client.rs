//! HTTP client for Kloudless API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the Kloudless API.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::KloudlessConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Kloudless API.
///
/// The client handles:
/// - URL construction from the configured base URL and API version
/// - Default headers including `User-Agent` and `Authorization`
/// - JSON and binary request bodies
/// - Mapping non-2xx responses to [`HttpResponseError`]
///
/// Each call to [`request`](Self::request) performs exactly one attempt.
///
/// # Example
///
/// ```rust,ignore
/// use kloudless::{ApiKey, KloudlessConfig};
/// use kloudless::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = KloudlessConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "accounts").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    /// Base URI (e.g., `https://api.kloudless.com`).
    base_uri: String,
    /// Base path (e.g., `/v1`).
    base_path: String,
    default_headers: HashMap<String, String>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (for example when TLS initialization fails).
    pub fn new(config: &KloudlessConfig) -> Result<Self, HttpError> {
        let base_uri = config.base_url().as_ref().to_string();
        let base_path = format!("/{}", config.api_version());

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Kloudless Rust Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Authorization".to_string(),
            config.credentials().authorization_header(),
        );

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_uri,
            base_path,
            default_headers,
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the Kloudless API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    /// - A non-2xx response is received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}/{}", self.base_uri, self.base_path, request.path);

        let mut headers = self.default_headers.clone();
        if let Some(body) = &request.body {
            headers.insert(
                "Content-Type".to_string(),
                body.content_type().to_string(),
            );
        }
        for (key, value) in &request.extra_headers {
            headers.insert(key.clone(), value.clone());
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            if reqwest::header::HeaderValue::from_str(value).is_err() {
                return Err(InvalidHttpRequestError::InvalidHeader { name: key.clone() }.into());
            }
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body.into_bytes());
        }

        tracing::debug!(method = %request.http_method, path = %request.path, "Sending Kloudless request");

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let bytes = res.bytes().await?.to_vec();

        tracing::debug!(status = code, path = %request.path, "Received Kloudless response");

        let body = Self::parse_body(code, &res_headers, &bytes, &request.path);
        let response = HttpResponse::with_bytes(code, res_headers, body, bytes);

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::serialize_error(&response),
            error_reference: response.request_id().map(String::from),
            retry_after: response.retry_request_after,
            body: response.body,
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a body as JSON unless the server declared a non-JSON content type.
    fn parse_body(
        code: u16,
        headers: &HashMap<String, Vec<String>>,
        bytes: &[u8],
        path: &str,
    ) -> serde_json::Value {
        if bytes.is_empty() {
            return serde_json::json!({});
        }

        let declared_json = headers
            .get("content-type")
            .and_then(|values| values.first())
            .map_or(true, |ct| ct.contains("json"));

        if !declared_json && (200..=299).contains(&code) {
            return serde_json::Value::Null;
        }

        serde_json::from_slice(bytes).unwrap_or_else(|_| {
            tracing::warn!(status = code, path, "Response body is not valid JSON");
            if code >= 400 {
                serde_json::json!({ "raw_body": String::from_utf8_lossy(bytes) })
            } else {
                serde_json::Value::Null
            }
        })
    }

    /// Serializes the Kloudless error fields of a response to compact JSON.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();
        error_body.insert("status_code".to_string(), serde_json::json!(response.code));

        for key in ["error_code", "message", "raw_body"] {
            if let Some(value) = response.body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert("id".to_string(), serde_json::json!(request_id));
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}
