use error_stack::{Report, ResultExt};
use log::LevelFilter;

use crate::error::GatewayError;

/// Initialize logging for the application.
/// Should be called once at the start of main().
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] if a global logger is already installed.
pub fn init_logging(level: LevelFilter) -> Result<(), Report<GatewayError>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}  {} {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .change_context(GatewayError::configuration("Failed to initialize logger"))
}

