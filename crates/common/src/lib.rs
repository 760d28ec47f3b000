//! Request signing and notification verification for the Pay2go gateway.
//!
//! The gateway authenticates both directions of a payment with a SHA-256
//! checksum over a sorted, form-encoded subset of the message fields wrapped
//! in the merchant's hash key and hash IV.
//!
//! # Modules
//!
//! - [`canonical`]: Canonical encoding and checksum computation
//! - [`constants`]: Protocol constants and signed field subsets
//! - [`error`]: Error types
//! - [`fields`]: Gateway field catalogue and field sets
//! - [`logging`]: Logger setup
//! - [`notification`]: Inbound notifications and `CheckCode` verification
//! - [`payment_request`]: Outbound payment request builder
//! - [`secret`]: Redacting holder for the hash key and IV
//! - [`settings`]: Configuration management and validation
//! - [`signer`]: Outbound `CheckValue` signing
//! - [`test_support`]: Testing utilities

pub mod canonical;
pub mod constants;
pub mod error;
pub mod fields;
pub mod logging;
pub mod notification;
pub mod payment_request;
pub mod secret;
pub mod settings;
pub mod signer;

pub use error::GatewayError;
pub use fields::{FieldSet, InboundField, OutboundField};
pub use notification::{Notification, NotificationVerifier, Outcome};
pub use payment_request::PaymentRequest;
pub use settings::{GatewayConfig, Mode, Settings};
pub use signer::RequestSigner;
