//! Webhook notification verification.
//!
//! - [`verify_webhook`]: checks the signature with the configured API key and
//!   parses the notification
//! - [`verify_signature`]: the signature check alone
//! - [`compute_signature`]: the signature Kloudless sends, for tests
//!
//! Notifications only say which account changed. Fetch the changes with
//! the account's events collection.

mod errors;
mod verification;

pub use errors::WebhookError;
pub use verification::{
    compute_signature, verify_signature, verify_webhook, WebhookNotification, WebhookRequest,
    HEADER_SIGNATURE,
};
