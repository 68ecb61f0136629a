//! Webhook signature verification.
//!
//! Kloudless signs every notification with HMAC-SHA256 keyed by the
//! application's API key and sends the base64 digest in the
//! `X-Kloudless-Signature` header. The body names the account that changed
//! and, for subscription-based notifications, the subscription:
//!
//! ```text
//! account=832496&subscription=1
//! ```
//!
//! # Example
//!
//! ```rust
//! use kloudless::webhooks::{compute_signature, verify_webhook, WebhookRequest};
//! use kloudless::{ApiKey, KloudlessConfig};
//!
//! let config = KloudlessConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let body = b"account=832496&subscription=1";
//! let signature = compute_signature(body, "my-api-key");
//! let request = WebhookRequest::new(body.to_vec(), signature, None);
//!
//! let notification = verify_webhook(&config, &request).unwrap();
//! assert_eq!(notification.account().as_ref(), "832496");
//! assert_eq!(notification.subscription(), Some("1"));
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::{AccountId, KloudlessConfig};
use crate::webhooks::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// HTTP header carrying the notification signature.
pub const HEADER_SIGNATURE: &str = "X-Kloudless-Signature";

/// An incoming notification, as received.
///
/// The body is kept as raw bytes; the signature covers them exactly.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    body: Vec<u8>,
    signature: String,
    content_type: Option<String>,
}

impl WebhookRequest {
    /// Creates a request from the raw body, the signature header and the
    /// `Content-Type` header.
    #[must_use]
    pub const fn new(body: Vec<u8>, signature: String, content_type: Option<String>) -> Self {
        Self {
            body,
            signature,
            content_type,
        }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the signature header value.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the `Content-Type` header value, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// A verified notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookNotification {
    account: AccountId,
    subscription: Option<String>,
}

impl WebhookNotification {
    /// Returns the account whose data changed.
    #[must_use]
    pub const fn account(&self) -> &AccountId {
        &self.account
    }

    /// Returns the subscription id, for subscription-based notifications.
    #[must_use]
    pub fn subscription(&self) -> Option<&str> {
        self.subscription.as_deref()
    }
}

#[derive(Deserialize)]
struct JsonNotification {
    account: AccountId,
    #[serde(default)]
    subscription: Option<Value>,
}

/// Computes the base64 HMAC-SHA256 of `body` keyed by `api_key`.
#[must_use]
pub fn compute_signature(body: &[u8], api_key: &str) -> String {
    HmacSha256::new_from_slice(api_key.as_bytes())
        .map(|mut mac| {
            mac.update(body);
            STANDARD.encode(mac.finalize().into_bytes())
        })
        .unwrap_or_default()
}

/// Checks `signature` against the body in constant time.
///
/// An empty signature never verifies.
#[must_use]
pub fn verify_signature(body: &[u8], signature: &str, api_key: &str) -> bool {
    let signature = signature.trim();
    if signature.is_empty() {
        return false;
    }
    let computed = compute_signature(body, api_key);
    !computed.is_empty() && bool::from(computed.as_bytes().ct_eq(signature.as_bytes()))
}

/// Verifies a notification and parses its body.
///
/// Form-encoded and JSON bodies are accepted; JSON is assumed when the
/// content type says so or the body starts with `{`.
///
/// # Errors
///
/// - [`WebhookError::MissingApiKey`] if `config` has no API key.
/// - [`WebhookError::InvalidSignature`] if the signature does not match.
/// - [`WebhookError::InvalidBody`] if the body names no account.
pub fn verify_webhook(
    config: &KloudlessConfig,
    request: &WebhookRequest,
) -> Result<WebhookNotification, WebhookError> {
    let api_key = config.api_key().ok_or(WebhookError::MissingApiKey)?;

    if !verify_signature(request.body(), request.signature(), api_key.as_ref()) {
        return Err(WebhookError::InvalidSignature);
    }

    let is_json = request
        .content_type()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
        || request.body().iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{');

    if is_json {
        parse_json(request.body())
    } else {
        parse_form(request.body())
    }
}

fn parse_json(body: &[u8]) -> Result<WebhookNotification, WebhookError> {
    let parsed: JsonNotification =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidBody {
            reason: e.to_string(),
        })?;
    let subscription = match parsed.subscription {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(WebhookNotification {
        account: parsed.account,
        subscription,
    })
}

fn parse_form(body: &[u8]) -> Result<WebhookNotification, WebhookError> {
    let body = std::str::from_utf8(body).map_err(|e| WebhookError::InvalidBody {
        reason: e.to_string(),
    })?;

    let mut account = None;
    let mut subscription = None;
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_form_value(value)?;
        match key {
            "account" => account = Some(value),
            "subscription" => subscription = Some(value),
            _ => {}
        }
    }

    let account = account.ok_or_else(|| WebhookError::InvalidBody {
        reason: "missing 'account'".to_string(),
    })?;
    let account = AccountId::new(account).map_err(|e| WebhookError::InvalidBody {
        reason: e.to_string(),
    })?;

    Ok(WebhookNotification {
        account,
        subscription,
    })
}

fn decode_form_value(value: &str) -> Result<String, WebhookError> {
    urlencoding::decode(&value.replace('+', " "))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| WebhookError::InvalidBody {
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, BearerToken};

    const KEY: &str = "test-api-key";

    fn config() -> KloudlessConfig {
        KloudlessConfig::builder()
            .api_key(ApiKey::new(KEY).unwrap())
            .build()
            .unwrap()
    }

    fn signed(body: &[u8], content_type: Option<&str>) -> WebhookRequest {
        WebhookRequest::new(
            body.to_vec(),
            compute_signature(body, KEY),
            content_type.map(ToString::to_string),
        )
    }

    #[test]
    fn test_compute_signature_is_base64_sha256() {
        let signature = compute_signature(b"payload", KEY);
        assert_eq!(signature.len(), 44);
        assert_eq!(STANDARD.decode(&signature).unwrap().len(), 32);
        assert_ne!(signature, compute_signature(b"payload", "other-key"));
    }

    #[test]
    fn test_verify_signature() {
        let signature = compute_signature(b"account=1", KEY);
        assert!(verify_signature(b"account=1", &signature, KEY));
        assert!(verify_signature(b"account=1", &format!(" {signature}\n"), KEY));
        assert!(!verify_signature(b"account=2", &signature, KEY));
        assert!(!verify_signature(b"account=1", &signature, "wrong"));
        assert!(!verify_signature(b"account=1", "", KEY));
    }

    #[test]
    fn test_verify_form_notification() {
        let notification = verify_webhook(&config(), &signed(b"account=832496&subscription=7", None)).unwrap();
        assert_eq!(notification.account().as_ref(), "832496");
        assert_eq!(notification.subscription(), Some("7"));

        let notification = verify_webhook(&config(), &signed(b"account=5", None)).unwrap();
        assert!(notification.subscription().is_none());
    }

    #[test]
    fn test_verify_json_notification() {
        let body = br#"{"account": 832496, "subscription": 3}"#;
        let notification = verify_webhook(&config(), &signed(body, Some("application/json"))).unwrap();
        assert_eq!(notification.account().as_ref(), "832496");
        assert_eq!(notification.subscription(), Some("3"));

        let body = br#" {"account": "12"}"#;
        let notification = verify_webhook(&config(), &signed(body, None)).unwrap();
        assert_eq!(notification.account().as_ref(), "12");
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let mut request = signed(b"account=1", None);
        request.body = b"account=2".to_vec();
        assert_eq!(
            verify_webhook(&config(), &request),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_body_without_account_is_rejected() {
        assert!(matches!(
            verify_webhook(&config(), &signed(b"subscription=1", None)),
            Err(WebhookError::InvalidBody { .. })
        ));
        assert!(matches!(
            verify_webhook(&config(), &signed(b"{}", Some("application/json"))),
            Err(WebhookError::InvalidBody { .. })
        ));
    }

    #[test]
    fn test_bearer_config_cannot_verify() {
        let config = KloudlessConfig::builder()
            .bearer_token(BearerToken::new("token").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            verify_webhook(&config, &signed(b"account=1", None)),
            Err(WebhookError::MissingApiKey)
        );
    }

    #[test]
    fn test_form_values_are_decoded() {
        assert_eq!(decode_form_value("a%20b+c").unwrap(), "a b c");
    }
}
