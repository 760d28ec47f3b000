//! CLI error types.

use std::fmt;

use error_stack::Report;
use pay2go_common::GatewayError;

#[derive(Debug)]
pub enum CliError {
    /// Settings file error
    Config(String),
    /// Signing or verification failed to run
    Gateway(String),
    /// IO error
    Io(std::io::Error),
    /// Field file could not be parsed
    Json(String),
    /// Notification checksum did not verify
    Rejected(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Gateway(msg) => write!(f, "Gateway error: {}", msg),
            CliError::Io(err) => write!(f, "IO error: {}", err),
            CliError::Json(msg) => write!(f, "JSON error: {}", msg),
            CliError::Rejected(msg) => write!(f, "Notification rejected: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err.to_string())
    }
}

impl From<Report<GatewayError>> for CliError {
    fn from(report: Report<GatewayError>) -> Self {
        let message = report.current_context().to_string();
        log::debug!("{report:?}");
        match report.current_context() {
            GatewayError::Configuration { .. } | GatewayError::InvalidMode { .. } => {
                CliError::Config(message)
            }
            GatewayError::MissingField { .. } | GatewayError::InvalidNotification { .. } => {
                CliError::Gateway(message)
            }
        }
    }
}
