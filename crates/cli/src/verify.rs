//! The `verify` command: check the `CheckCode` of a captured notification.

use std::fs;
use std::path::Path;

use pay2go_common::{FieldSet, GatewayConfig, Notification, NotificationVerifier, Outcome};

use crate::config::load_gateway_config;
use crate::error::CliError;

/// Where the captured notification comes from.
pub enum Source<'a> {
    /// Flat JSON object of field names to values
    Json(&'a Path),
    /// Raw form-encoded callback body
    FormBody(&'a Path),
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Succeeded => "succeeded",
        Outcome::CustomFlow => "custom",
        Outcome::Other => "other",
    }
}

pub(crate) fn load_notification(source: &Source<'_>) -> Result<Notification, CliError> {
    match source {
        Source::Json(path) => {
            let fields: FieldSet = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(Notification::new(fields))
        }
        Source::FormBody(path) => Ok(Notification::from_form_body(&fs::read_to_string(path)?)?),
    }
}

pub(crate) fn verify_notification(
    config: &GatewayConfig,
    notification: &Notification,
) -> Result<serde_json::Value, CliError> {
    let verifier = NotificationVerifier::new(config);
    let verified = notification.acknowledge(&verifier)?;
    let outcome = notification.outcome();

    let report = serde_json::json!({
        "verified": verified,
        "outcome": outcome_label(outcome),
        "complete": outcome.is_complete(),
        "merchant_order_no": notification.merchant_order_no(),
        "trade_no": notification.trade_no(),
        "amount": notification.amount(),
    });

    if verified {
        Ok(report)
    } else {
        Err(CliError::Rejected(format!(
            "CheckCode does not match for order {}",
            notification.merchant_order_no().unwrap_or("<unknown>")
        )))
    }
}

/// Verify a captured notification and print the verdict as JSON.
pub fn run(config_file: &Path, source: &Source<'_>, verbose: bool) -> Result<(), CliError> {
    let config = load_gateway_config(config_file, verbose)?;
    let notification = load_notification(source)?;

    let report = verify_notification(&config, &notification)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
