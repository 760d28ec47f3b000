//! Outbound request signing (`CheckValue`).

use error_stack::{Report, ResultExt};

use crate::canonical::{canonical_encode, checksum, SecretWrapping};
use crate::constants::CHECK_VALUE_FIELDS;
use crate::error::GatewayError;
use crate::fields::{FieldSet, OutboundField};
use crate::settings::GatewayConfig;

/// Computes `CheckValue` over the outbound signed subset of `fields`.
///
/// The caller's field set is not modified.
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] if `hash_key` or `hash_iv` is empty
/// and [`GatewayError::MissingField`] if a signed field is absent.
pub fn sign(
    fields: &FieldSet,
    hash_key: &str,
    hash_iv: &str,
) -> Result<String, Report<GatewayError>> {
    ensure_secrets(hash_key, hash_iv)?;

    let canonical = canonical_encode(fields, &CHECK_VALUE_FIELDS)
        .attach("while encoding the CheckValue subset")?;

    Ok(checksum(
        &canonical,
        hash_key,
        hash_iv,
        SecretWrapping::KeyFirst,
    ))
}

pub(crate) fn ensure_secrets(hash_key: &str, hash_iv: &str) -> Result<(), Report<GatewayError>> {
    if hash_key.trim().is_empty() {
        return Err(Report::new(GatewayError::configuration(
            "hash_key is not set",
        )));
    }
    if hash_iv.trim().is_empty() {
        return Err(Report::new(GatewayError::configuration(
            "hash_iv is not set",
        )));
    }
    Ok(())
}

/// Signs outbound payment requests for one merchant account.
#[derive(Debug, Clone, Copy)]
pub struct RequestSigner<'a> {
    config: &'a GatewayConfig,
}

impl<'a> RequestSigner<'a> {
    #[must_use]
    pub fn new(config: &'a GatewayConfig) -> Self {
        Self { config }
    }

    /// Computes `CheckValue` for `fields`.
    ///
    /// # Errors
    ///
    /// See [`sign`].
    pub fn check_value(&self, fields: &FieldSet) -> Result<String, Report<GatewayError>> {
        sign(
            fields,
            self.config.hash_key().expose(),
            self.config.hash_iv().expose(),
        )
    }

    /// Returns a copy of `fields` with `CheckValue` attached.
    ///
    /// # Errors
    ///
    /// See [`sign`].
    pub fn sign(&self, fields: &FieldSet) -> Result<FieldSet, Report<GatewayError>> {
        let check_value = self.check_value(fields)?;
        log::debug!(
            "Signed request for order {}",
            fields
                .field(OutboundField::MerchantOrderNo)
                .unwrap_or("<unknown>")
        );

        let mut signed = fields.clone();
        signed.set(OutboundField::CheckValue, check_value);
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    use crate::test_support::tests::{
        create_test_config, outbound_fields, HASH_IV, HASH_KEY, OUTBOUND_CHECK_VALUE,
    };

    #[test]
    fn test_sign_matches_independent_computation() {
        let digest = sign(&outbound_fields(), HASH_KEY, HASH_IV).expect("should sign");

        let raw = format!(
            "HashKey={HASH_KEY}&Amt=100&MerchantID=MID&MerchantOrderNo=ORD1&TimeStamp=1700000000&Version=1.2&HashIV={HASH_IV}"
        );
        let expected = hex::encode_upper(Sha256::digest(raw.as_bytes()));

        assert_eq!(digest, expected);
        assert_eq!(digest, OUTBOUND_CHECK_VALUE);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let fields = outbound_fields();
        let first = sign(&fields, HASH_KEY, HASH_IV).expect("should sign");
        let second = sign(&fields, HASH_KEY, HASH_IV).expect("should sign");
        assert_eq!(first, second);
    }

    #[test]
    fn test_sign_is_sensitive_to_every_signed_field() {
        let baseline = sign(&outbound_fields(), HASH_KEY, HASH_IV).expect("should sign");

        for field in CHECK_VALUE_FIELDS {
            let mut fields = outbound_fields();
            let original = fields.field(field).expect("fixture has field").to_string();
            fields.set(field, format!("{original}0"));

            let digest = sign(&fields, HASH_KEY, HASH_IV).expect("should sign");
            assert_ne!(digest, baseline, "digest should change with {field}");
        }
    }

    #[test]
    fn test_sign_ignores_unsigned_fields() {
        let baseline = sign(&outbound_fields(), HASH_KEY, HASH_IV).expect("should sign");
        let fields = outbound_fields().with(OutboundField::ItemDesc.as_str(), "Green tea");
        assert_eq!(
            sign(&fields, HASH_KEY, HASH_IV).expect("should sign"),
            baseline
        );
    }

    #[test]
    fn test_sign_depends_on_secrets() {
        let fields = outbound_fields();
        let baseline = sign(&fields, HASH_KEY, HASH_IV).expect("should sign");
        assert_ne!(
            sign(&fields, "other-key", HASH_IV).expect("should sign"),
            baseline
        );
        assert_ne!(
            sign(&fields, HASH_KEY, "other-iv").expect("should sign"),
            baseline
        );
    }

    #[test]
    fn test_sign_missing_amount() {
        let mut fields = outbound_fields();
        fields.remove("Amt");

        let err = sign(&fields, HASH_KEY, HASH_IV).expect_err("should fail");
        assert!(matches!(
            err.current_context(),
            GatewayError::MissingField { field } if field == "Amt"
        ));
    }

    #[test]
    fn test_sign_requires_secrets() {
        let fields = outbound_fields();
        for (key, iv) in [("", HASH_IV), (HASH_KEY, ""), ("  ", HASH_IV)] {
            let err = sign(&fields, key, iv).expect_err("should fail");
            assert!(matches!(
                err.current_context(),
                GatewayError::Configuration { .. }
            ));
        }
    }

    #[test]
    fn test_request_signer_attaches_check_value() {
        let config = create_test_config();
        let signer = RequestSigner::new(&config);
        let fields = outbound_fields();

        let signed = signer.sign(&fields).expect("should sign");
        assert_eq!(
            signed.field(OutboundField::CheckValue),
            Some(OUTBOUND_CHECK_VALUE)
        );
        assert!(fields.field(OutboundField::CheckValue).is_none());
        assert_eq!(signed.len(), fields.len() + 1);
    }
}
