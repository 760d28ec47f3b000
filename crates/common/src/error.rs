//! Error types for the gateway integration.
//!
//! All fallible operations return `Result<T, Report<GatewayError>>` so callers
//! get the full context chain when something goes wrong. A checksum mismatch
//! on an inbound notification is not an error: it is reported as `Ok(false)`.

use derive_more::{Display, Error};

/// Errors raised while configuring, signing or verifying gateway messages.
#[derive(Debug, Display, Error)]
pub enum GatewayError {
    /// Missing or invalid merchant configuration (empty secret, bad TOML, failed validation).
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// Deployment mode is not one of `production`, `development` or `test`.
    #[display("Integration mode set to an invalid value: {mode}")]
    InvalidMode { mode: String },

    /// A field that participates in the digest is absent from the field set.
    #[display("Missing signed field: {field}")]
    MissingField { field: String },

    /// Inbound callback body could not be turned into a field set.
    #[display("Invalid notification: {message}")]
    InvalidNotification { message: String },
}

impl GatewayError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
