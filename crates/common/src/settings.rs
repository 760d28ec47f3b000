//! Merchant configuration.
//!
//! Settings are read from TOML and overlaid with `PAY2GO__*` environment
//! variables, e.g. `PAY2GO__GATEWAY__HASH_KEY` overrides `gateway.hash_key`.
//! The resulting [`GatewayConfig`] is immutable and handed by reference to
//! the signer and the verifier.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{
    ENVIRONMENT_VARIABLE_PREFIX, ENVIRONMENT_VARIABLE_SEPARATOR, PRODUCTION_SERVICE_URL,
    SANDBOX_SERVICE_URL,
};
use crate::error::GatewayError;
use crate::secret::Secret;

/// Deployment mode, which selects the gateway endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    Development,
    Test,
}

impl Mode {
    #[must_use]
    pub const fn service_url(self) -> &'static str {
        match self {
            Mode::Production => PRODUCTION_SERVICE_URL,
            Mode::Development | Mode::Test => SANDBOX_SERVICE_URL,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Production => "production",
            Mode::Development => "development",
            Mode::Test => "test",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Report<GatewayError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Mode::Production),
            "development" => Ok(Mode::Development),
            "test" => Ok(Mode::Test),
            _ => Err(Report::new(GatewayError::InvalidMode {
                mode: s.to_string(),
            })),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct Gateway {
    #[validate(length(min = 1))]
    pub merchant_id: String,
    pub hash_key: Secret,
    pub hash_iv: Secret,
    pub mode: String,
    /// Overrides the endpoint otherwise derived from `mode`.
    #[serde(default)]
    #[validate(url)]
    pub service_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub gateway: Gateway,
}

impl Settings {
    /// Parses settings from TOML, applies environment overrides and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when the TOML is malformed, a
    /// required key is missing, validation fails or a secret is empty, and
    /// [`GatewayError::InvalidMode`] for an unknown deployment mode.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<GatewayError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_VARIABLE_PREFIX)
            .separator(ENVIRONMENT_VARIABLE_SEPARATOR);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let settings: Settings = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(GatewayError::configuration("Failed to build settings"))?
            .try_deserialize()
            .change_context(GatewayError::configuration("Failed to deserialize settings"))?;

        settings
            .validate()
            .change_context(GatewayError::configuration("Settings validation failed"))?;

        // Surface bad modes and empty secrets at load time, not on first use.
        settings.gateway_config()?;

        Ok(settings)
    }

    /// Reads and parses a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the file cannot be read, plus
    /// everything [`Settings::from_toml`] can return.
    pub fn from_file(path: &Path) -> Result<Self, Report<GatewayError>> {
        let content = fs::read_to_string(path)
            .change_context(GatewayError::configuration("Failed to read settings file"))
            .attach(format!("path: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Builds the immutable gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidMode`] or [`GatewayError::Configuration`].
    pub fn gateway_config(&self) -> Result<GatewayConfig, Report<GatewayError>> {
        let mode = self.gateway.mode.parse::<Mode>()?;
        let config = GatewayConfig::new(
            self.gateway.merchant_id.clone(),
            self.gateway.hash_key.clone(),
            self.gateway.hash_iv.clone(),
            mode,
        )?;

        Ok(match &self.gateway.service_url {
            Some(url) => config.with_service_url(url.clone()),
            None => config,
        })
    }
}

/// Merchant identity, secrets and endpoint for one gateway account.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    merchant_id: String,
    hash_key: Secret,
    hash_iv: Secret,
    mode: Mode,
    service_url: String,
}

impl GatewayConfig {
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the merchant id, hash key or
    /// hash IV is empty.
    pub fn new(
        merchant_id: impl Into<String>,
        hash_key: impl Into<Secret>,
        hash_iv: impl Into<Secret>,
        mode: Mode,
    ) -> Result<Self, Report<GatewayError>> {
        let merchant_id = merchant_id.into();
        let hash_key = hash_key.into();
        let hash_iv = hash_iv.into();

        if merchant_id.trim().is_empty() {
            return Err(Report::new(GatewayError::configuration(
                "merchant_id must not be empty",
            )));
        }
        if hash_key.is_empty() {
            return Err(Report::new(GatewayError::configuration(
                "hash_key must not be empty",
            )));
        }
        if hash_iv.is_empty() {
            return Err(Report::new(GatewayError::configuration(
                "hash_iv must not be empty",
            )));
        }

        Ok(Self {
            merchant_id,
            hash_key,
            hash_iv,
            mode,
            service_url: mode.service_url().to_string(),
        })
    }

    #[must_use]
    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }

    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    #[must_use]
    pub fn hash_key(&self) -> &Secret {
        &self.hash_key
    }

    #[must_use]
    pub fn hash_iv(&self) -> &Secret {
        &self.hash_iv
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.service_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tests::{crate_test_settings_str, HASH_IV, HASH_KEY};

    const OVERRIDDEN_VARS: [&str; 2] = ["PAY2GO__GATEWAY__HASH_KEY", "PAY2GO__GATEWAY__MODE"];

    /// Parses without picking up overrides set by the env tests running in parallel.
    fn from_toml_isolated(toml_str: &str) -> Result<Settings, Report<GatewayError>> {
        temp_env::with_vars_unset(OVERRIDDEN_VARS, || Settings::from_toml(toml_str))
    }

    #[test]
    fn test_settings_from_valid_toml() {
        let settings =
            from_toml_isolated(&crate_test_settings_str()).expect("should parse test settings");

        assert_eq!(settings.gateway.merchant_id, "MID");
        assert_eq!(settings.gateway.hash_key.expose(), HASH_KEY);
        assert_eq!(settings.gateway.hash_iv.expose(), HASH_IV);

        let config = settings.gateway_config().expect("should build config");
        assert_eq!(config.mode(), Mode::Test);
        assert_eq!(config.service_url(), SANDBOX_SERVICE_URL);
    }

    #[test]
    fn test_mode_service_urls() {
        assert_eq!(Mode::Production.service_url(), PRODUCTION_SERVICE_URL);
        assert_eq!(Mode::Development.service_url(), SANDBOX_SERVICE_URL);
        assert_eq!(Mode::Test.service_url(), SANDBOX_SERVICE_URL);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("production".parse::<Mode>().ok(), Some(Mode::Production));
        assert_eq!("Development".parse::<Mode>().ok(), Some(Mode::Development));
        assert_eq!(" test ".parse::<Mode>().ok(), Some(Mode::Test));

        let err = "staging".parse::<Mode>().expect_err("should reject");
        assert!(matches!(
            err.current_context(),
            GatewayError::InvalidMode { mode } if mode == "staging"
        ));
    }

    #[test]
    fn test_invalid_mode_is_fatal() {
        let toml_str = r#"
            [gateway]
            merchant_id = "MID"
            hash_key = "key"
            hash_iv = "iv"
            mode = "staging"
            "#;

        let err = from_toml_isolated(toml_str).expect_err("should reject unknown mode");
        assert!(matches!(
            err.current_context(),
            GatewayError::InvalidMode { .. }
        ));
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let toml_str = r#"
            [gateway]
            merchant_id = "MID"
            hash_key = ""
            hash_iv = "iv"
            mode = "test"
            "#;

        let err = from_toml_isolated(toml_str).expect_err("should reject empty hash_key");
        assert!(matches!(
            err.current_context(),
            GatewayError::Configuration { .. }
        ));
    }

    #[test]
    fn test_settings_missing_required_fields() {
        let toml_str = r#"
            [gateway]
            merchant_id = "MID"
            hash_key = "key"
            mode = "test"
            "#;

        assert!(
            from_toml_isolated(toml_str).is_err(),
            "Should fail when hash_iv is missing"
        );
    }

    #[test]
    fn test_settings_empty_toml() {
        assert!(from_toml_isolated("").is_err(), "Should fail with empty TOML");
    }

    #[test]
    fn test_settings_invalid_toml_syntax() {
        let toml_str = r#"
            [gateway
            merchant_id = "MID"
            "#;

        assert!(
            from_toml_isolated(toml_str).is_err(),
            "Should fail with invalid TOML syntax"
        );
    }

    #[test]
    fn test_service_url_override() {
        let toml_str = r#"
            [gateway]
            merchant_id = "MID"
            hash_key = "key"
            hash_iv = "iv"
            mode = "production"
            service_url = "https://proxy.example.com/MPG/mpg_gateway"
            "#;

        let config = from_toml_isolated(toml_str)
            .and_then(|s| s.gateway_config())
            .expect("should build config");
        assert_eq!(config.mode(), Mode::Production);
        assert_eq!(
            config.service_url(),
            "https://proxy.example.com/MPG/mpg_gateway"
        );
    }

    #[test]
    fn test_service_url_override_must_be_url() {
        let toml_str = r#"
            [gateway]
            merchant_id = "MID"
            hash_key = "key"
            hash_iv = "iv"
            mode = "production"
            service_url = "not a url"
            "#;

        assert!(from_toml_isolated(toml_str).is_err());
    }

    #[test]
    fn test_env_overrides_secret() {
        temp_env::with_var("PAY2GO__GATEWAY__HASH_KEY", Some("env-hash-key"), || {
            let settings = Settings::from_toml(&crate_test_settings_str())
                .expect("should parse test settings");
            assert_eq!(settings.gateway.hash_key.expose(), "env-hash-key");
        });
    }

    #[test]
    fn test_env_overrides_mode() {
        temp_env::with_var("PAY2GO__GATEWAY__MODE", Some("production"), || {
            let config = Settings::from_toml(&crate_test_settings_str())
                .and_then(|s| s.gateway_config())
                .expect("should build config");
            assert_eq!(config.service_url(), PRODUCTION_SERVICE_URL);
        });
    }

    #[test]
    fn test_settings_debug_redacts_secrets() {
        let settings =
            from_toml_isolated(&crate_test_settings_str()).expect("should parse test settings");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains(HASH_KEY));
        assert!(!rendered.contains(HASH_IV));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_gateway_config_rejects_empty_values() {
        assert!(GatewayConfig::new("", "key", "iv", Mode::Test).is_err());
        assert!(GatewayConfig::new("MID", "", "iv", Mode::Test).is_err());
        assert!(GatewayConfig::new("MID", "key", " ", Mode::Test).is_err());
        assert!(GatewayConfig::new("MID", "key", "iv", Mode::Test).is_ok());
    }
}
