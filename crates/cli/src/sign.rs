//! The `sign` command: turn a JSON field file into signed form fields.

use std::fs;
use std::path::Path;

use chrono::Utc;
use pay2go_common::constants::{RESPOND_TYPE, VERSION};
use pay2go_common::{FieldSet, GatewayConfig, OutboundField, RequestSigner};

use crate::config::load_gateway_config;
use crate::error::CliError;

/// Fill protocol fields the caller left out and attach `CheckValue`.
///
/// `MerchantID` always comes from the configuration. `TimeStamp` defaults to
/// `timestamp`, then to the current time.
pub(crate) fn sign_fields(
    config: &GatewayConfig,
    mut fields: FieldSet,
    timestamp: Option<i64>,
) -> Result<FieldSet, CliError> {
    if let Some(supplied) = fields.field(OutboundField::MerchantId) {
        if supplied != config.merchant_id() {
            log::warn!("Replacing MerchantID from field file with the configured merchant id");
        }
    }
    fields.set(OutboundField::MerchantId, config.merchant_id());

    if !fields.contains(OutboundField::Version.as_str()) {
        fields.set(OutboundField::Version, VERSION);
    }
    if !fields.contains(OutboundField::RespondType.as_str()) {
        fields.set(OutboundField::RespondType, RESPOND_TYPE);
    }
    if let Some(ts) = timestamp {
        fields.set(OutboundField::TimeStamp, ts);
    } else if !fields.contains(OutboundField::TimeStamp.as_str()) {
        fields.set(OutboundField::TimeStamp, Utc::now().timestamp());
    }

    Ok(RequestSigner::new(config).sign(&fields)?)
}

/// Sign the fields in `fields_file` and print the result as JSON.
pub fn run(
    config_file: &Path,
    fields_file: &Path,
    timestamp: Option<i64>,
    verbose: bool,
) -> Result<(), CliError> {
    let config = load_gateway_config(config_file, verbose)?;
    let fields: FieldSet = serde_json::from_str(&fs::read_to_string(fields_file)?)?;

    let signed = sign_fields(&config, fields, timestamp)?;

    let output = serde_json::json!({
        "service_url": config.service_url(),
        "fields": signed,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
