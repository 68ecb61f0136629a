//! Webhook error types.

use thiserror::Error;

/// Error type for webhook verification.
///
/// # Example
///
/// ```rust
/// use kloudless::webhooks::WebhookError;
///
/// let error = WebhookError::InvalidSignature;
/// assert_eq!(error.to_string(), "Webhook signature verification failed");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The signature header is missing or does not match the body.
    ///
    /// The message is generic on purpose.
    #[error("Webhook signature verification failed")]
    InvalidSignature,

    /// The configuration carries a bearer token instead of an API key, and
    /// only the API key can verify notifications.
    #[error("Verifying webhooks requires an API key in KloudlessConfig")]
    MissingApiKey,

    /// The signature matched but the body could not be parsed.
    #[error("Invalid webhook body: {reason}")]
    InvalidBody {
        /// What went wrong.
        reason: String,
    },
}
