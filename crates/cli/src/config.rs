//! Settings loading and the `config validate` command.
//!
//! Settings are loaded from a TOML file and merged with environment variables
//! prefixed with `PAY2GO__`. For example, `PAY2GO__GATEWAY__MODE` overrides
//! `gateway.mode` in the TOML file.

use std::path::Path;

use pay2go_common::{GatewayConfig, Settings};

use crate::error::CliError;

/// Load settings from `file` and build the gateway configuration.
pub(crate) fn load_gateway_config(file: &Path, verbose: bool) -> Result<GatewayConfig, CliError> {
    if verbose {
        println!("Loading config from: {}", file.display());
        println!("Environment variables with PAY2GO__ prefix will be merged");
    }

    let settings = Settings::from_file(file)?;
    Ok(settings.gateway_config()?)
}

/// Validate a settings file and print the resolved endpoint.
///
/// Secrets are never printed.
pub fn validate(file: &Path, verbose: bool) -> Result<(), CliError> {
    let config = load_gateway_config(file, verbose)?;

    println!("Configuration is valid");
    println!("  File: {}", file.display());
    println!("  Merchant ID: {}", config.merchant_id());
    println!("  Mode: {}", config.mode());
    println!("  Service URL: {}", config.service_url());
    if verbose {
        println!("  Hash key: {}", config.hash_key());
        println!("  Hash IV: {}", config.hash_iv());
    }

    Ok(())
}
