//! Inbound payment notifications and their `CheckCode` verification.
//!
//! The gateway has no query endpoint to confirm a notification, so a
//! recomputed `CheckCode` is the only proof that a callback is genuine.
//! Callers must require [`NotificationVerifier::verify`] to return `true`
//! before honouring any outcome, including [`Outcome::Succeeded`].

use error_stack::{Report, ResultExt};

use crate::canonical::{canonical_encode, checksum, checksums_match, SecretWrapping};
use crate::constants::{CHECK_CODE_FIELDS, STATUS_CUSTOM, STATUS_SUCCESS};
use crate::error::GatewayError;
use crate::fields::{FieldSet, InboundField};
use crate::settings::GatewayConfig;
use crate::signer::ensure_secrets;

/// Business outcome reported in the `Status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    CustomFlow,
    Other,
}

impl Outcome {
    #[must_use]
    pub fn classify(status: &str) -> Self {
        match status {
            STATUS_SUCCESS => Outcome::Succeeded,
            STATUS_CUSTOM => Outcome::CustomFlow,
            _ => Outcome::Other,
        }
    }

    /// Whether the transaction is finished from the merchant's point of view.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Outcome::Succeeded | Outcome::CustomFlow)
    }
}

#[must_use]
pub fn classify(status: &str) -> Outcome {
    Outcome::classify(status)
}

#[must_use]
pub fn complete(status: &str) -> bool {
    Outcome::classify(status).is_complete()
}

/// Checks the `CheckCode` of an inbound field set.
///
/// A missing or mismatching `CheckCode` yields `Ok(false)`.
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] if `hash_key` or `hash_iv` is empty
/// and [`GatewayError::MissingField`] if a signed field is absent.
pub fn verify(
    fields: &FieldSet,
    hash_key: &str,
    hash_iv: &str,
) -> Result<bool, Report<GatewayError>> {
    ensure_secrets(hash_key, hash_iv)?;

    let canonical = canonical_encode(fields, &CHECK_CODE_FIELDS)
        .attach("while encoding the CheckCode subset")?;
    let expected = checksum(&canonical, hash_key, hash_iv, SecretWrapping::IvFirst);

    let order_no = fields
        .field(InboundField::MerchantOrderNo)
        .unwrap_or("<unknown>");

    match fields.field(InboundField::CheckCode) {
        Some(supplied) if checksums_match(&expected, supplied) => {
            log::debug!("CheckCode verified for order {order_no}");
            Ok(true)
        }
        Some(_) => {
            log::warn!("CheckCode mismatch for order {order_no}");
            Ok(false)
        }
        None => {
            log::warn!("Notification for order {order_no} carries no CheckCode");
            Ok(false)
        }
    }
}

/// Verifies notifications for one merchant account.
#[derive(Debug, Clone, Copy)]
pub struct NotificationVerifier<'a> {
    config: &'a GatewayConfig,
}

impl<'a> NotificationVerifier<'a> {
    #[must_use]
    pub fn new(config: &'a GatewayConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// See [`verify`].
    pub fn verify(&self, fields: &FieldSet) -> Result<bool, Report<GatewayError>> {
        verify(
            fields,
            self.config.hash_key().expose(),
            self.config.hash_iv().expose(),
        )
    }
}

/// An asynchronous payment notification posted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    params: FieldSet,
}

impl Notification {
    #[must_use]
    pub fn new(params: FieldSet) -> Self {
        Self { params }
    }

    /// Parses a form-encoded callback body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidNotification`] if the body has no fields.
    pub fn from_form_body(body: &str) -> Result<Self, Report<GatewayError>> {
        let params = FieldSet::from_form_body(body.trim());
        if params.is_empty() {
            return Err(Report::new(GatewayError::InvalidNotification {
                message: "callback body contains no fields".to_string(),
            }));
        }
        Ok(Self::new(params))
    }

    #[must_use]
    pub fn params(&self) -> &FieldSet {
        &self.params
    }

    #[must_use]
    pub fn get(&self, field: InboundField) -> Option<&str> {
        self.params.field(field)
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.get(InboundField::Status)
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.get(InboundField::Message)
    }

    #[must_use]
    pub fn merchant_id(&self) -> Option<&str> {
        self.get(InboundField::MerchantId)
    }

    #[must_use]
    pub fn merchant_order_no(&self) -> Option<&str> {
        self.get(InboundField::MerchantOrderNo)
    }

    #[must_use]
    pub fn trade_no(&self) -> Option<&str> {
        self.get(InboundField::TradeNo)
    }

    /// Paid amount in whole currency units.
    #[must_use]
    pub fn amount(&self) -> Option<u64> {
        self.get(InboundField::Amt)?.trim().parse().ok()
    }

    #[must_use]
    pub fn payment_type(&self) -> Option<&str> {
        self.get(InboundField::PaymentType)
    }

    #[must_use]
    pub fn pay_time(&self) -> Option<&str> {
        self.get(InboundField::PayTime)
    }

    #[must_use]
    pub fn check_code(&self) -> Option<&str> {
        self.get(InboundField::CheckCode)
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.status().map_or(Outcome::Other, Outcome::classify)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome() == Outcome::Succeeded
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome().is_complete()
    }

    /// Acknowledges the notification, which for this gateway means checking its `CheckCode`.
    ///
    /// # Errors
    ///
    /// See [`verify`].
    pub fn acknowledge(
        &self,
        verifier: &NotificationVerifier<'_>,
    ) -> Result<bool, Report<GatewayError>> {
        verifier.verify(&self.params)
    }

    /// True only for a verified notification reporting a finished transaction.
    ///
    /// # Errors
    ///
    /// See [`verify`].
    pub fn is_authentic_completion(
        &self,
        verifier: &NotificationVerifier<'_>,
    ) -> Result<bool, Report<GatewayError>> {
        Ok(self.acknowledge(verifier)? && self.is_complete())
    }
}

impl From<FieldSet> for Notification {
    fn from(params: FieldSet) -> Self {
        Self::new(params)
    }
}
