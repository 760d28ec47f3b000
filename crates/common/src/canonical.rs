//! Canonical encoding and checksum computation shared by both directions.
//!
//! The gateway digests a sorted, form-encoded rendering of a fixed field
//! subset wrapped between the merchant hash key and hash IV:
//!
//! ```text
//! HashKey=<key>&Amt=100&MerchantID=MID&...&HashIV=<iv>     (CheckValue, outbound)
//! HashIV=<iv>&Amt=100&MerchantID=MID&...&HashKey=<key>     (CheckCode, inbound)
//! ```
//!
//! The SHA-256 of that string, hex encoded in upper case, is the checksum.

use error_stack::Report;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::GatewayError;
use crate::fields::{FieldSet, GatewayField};

/// Order in which the secrets wrap the canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretWrapping {
    /// `HashKey=..&<canonical>&HashIV=..`, used for `CheckValue`.
    KeyFirst,
    /// `HashIV=..&<canonical>&HashKey=..`, used for `CheckCode`.
    IvFirst,
}

/// Renders `names` from `fields` as `name=value` pairs sorted by name.
///
/// Values are form-encoded (space becomes `+`). Every listed field must be
/// present; an absent field is never encoded as empty.
///
/// # Errors
///
/// Returns [`GatewayError::MissingField`] for the first listed field that is
/// not in `fields`.
pub fn canonical_encode<F: GatewayField>(
    fields: &FieldSet,
    names: &[F],
) -> Result<String, Report<GatewayError>> {
    let mut sorted: Vec<&'static str> = names.iter().map(|f| f.as_str()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for name in sorted {
        let value = fields.get(name).ok_or_else(|| {
            Report::new(GatewayError::MissingField {
                field: name.to_string(),
            })
        })?;
        serializer.append_pair(name, value);
    }

    Ok(serializer.finish())
}

/// Computes the upper-case hex SHA-256 of the canonical string wrapped in the secrets.
#[must_use]
pub fn checksum(canonical: &str, hash_key: &str, hash_iv: &str, wrapping: SecretWrapping) -> String {
    let raw = Zeroizing::new(match wrapping {
        SecretWrapping::KeyFirst => format!("HashKey={hash_key}&{canonical}&HashIV={hash_iv}"),
        SecretWrapping::IvFirst => format!("HashIV={hash_iv}&{canonical}&HashKey={hash_key}"),
    });

    hex::encode_upper(Sha256::digest(raw.as_bytes()))
}

/// Compares two checksums in constant time. Case matters.
#[must_use]
pub fn checksums_match(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
