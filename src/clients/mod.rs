//! HTTP client types for Kloudless API communication.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async HTTP client, one attempt per request
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a parsed response from the API
//! - [`HttpMethod`]: GET, POST, PUT, PATCH and DELETE
//! - [`RequestBody`]: JSON or raw binary request bodies
//! - [`rest::RestClient`]: higher-level REST helpers
//! - [`rest::RestError`]: REST-specific error types
//!
//! Non-2xx responses surface as [`HttpError::Response`]. The client never
//! retries; callers decide what to do with a 429 or 5xx.

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody};
pub use http_response::HttpResponse;

pub use rest::{Query, RestClient, RestError};
