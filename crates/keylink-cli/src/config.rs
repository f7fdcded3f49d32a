// ============================================
// File: crates/keylink-cli/src/config.rs
// ============================================
//! # CLI Configuration
//!
//! ## Creation Reason
//! Provides configuration for the keylink binary, supporting TOML files
//! with command-line flag overrides.
//!
//! ## Main Functionality
//! - `CliConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation
//!
//! ## Example Configuration
//! ```toml
//! [link]
//! connect = "192.168.0.10:4040"
//! # or, to wait for the peer instead:
//! # listen = "0.0.0.0:4040"
//!
//! [exchange]
//! role = "read-first"
//! settle_ms = 2000
//! timeout_ms = 10000
//! allow_low_order = false
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Exactly one of `connect`/`listen` must be set after flag overrides
//! - `allow_low_order = true` disables the degenerate-peer-key check;
//!   leave it off unless talking to a legacy peer
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use keylink_common::ExchangeRole;
use keylink_core::SessionConfig;

// ============================================
// CliConfig
// ============================================

/// Main configuration for the keylink binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Link endpoint configuration.
    #[serde(default)]
    pub link: LinkConfig,

    /// Exchange behavior configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. Endpoint
    /// validation happens later, after flag overrides are applied.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Parses configuration from a string (useful for testing).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("failed to parse config")?;
        Ok(config)
    }

    /// Validates the effective configuration.
    ///
    /// # Errors
    /// Returns an error unless exactly one endpoint is set, or if the
    /// session settings are out of range.
    pub fn validate(&self) -> Result<()> {
        match (&self.link.connect, &self.link.listen) {
            (Some(_), Some(_)) => bail!("set either 'connect' or 'listen', not both"),
            (None, None) => bail!("one of 'connect' or 'listen' is required"),
            _ => {}
        }
        self.session_config()
            .validate()
            .context("invalid exchange settings")?;
        Ok(())
    }

    /// Builds the session configuration from the exchange settings.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_role(self.exchange.role)
            .with_settle_delay(Duration::from_millis(self.exchange.settle_ms))
            .with_io_timeout(self.exchange.timeout_ms.map(Duration::from_millis))
            .with_low_order_rejection(!self.exchange.allow_low_order)
    }
}

// ============================================
// Config Sections
// ============================================

/// Where to find the peer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfig {
    /// TCP address to connect to.
    pub connect: Option<String>,
    /// TCP address to accept one peer connection on.
    pub listen: Option<String>,
}

/// How to run the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Which leg runs first on this side.
    #[serde(default)]
    pub role: ExchangeRole,

    /// Pause after opening the channel, in milliseconds.
    #[serde(default)]
    pub settle_ms: u64,

    /// Per-operation I/O deadline in milliseconds; absent = wait forever.
    pub timeout_ms: Option<u64>,

    /// Accept peer keys that yield an all-zero shared secret.
    #[serde(default)]
    pub allow_low_order: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            role: ExchangeRole::default(),
            settle_ms: 0,
            timeout_ms: None,
            allow_low_order: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parses() {
        let config = CliConfig::from_str(
            r#"
            [link]
            connect = "192.168.0.10:4040"

            [exchange]
            role = "write-first"
            settle_ms = 2000
            timeout_ms = 10000
            allow_low_order = true

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.link.connect.as_deref(), Some("192.168.0.10:4040"));
        assert_eq!(config.exchange.role, ExchangeRole::WriteFirst);
        assert_eq!(config.exchange.settle_ms, 2000);
        assert_eq!(config.exchange.timeout_ms, Some(10_000));
        assert!(config.exchange.allow_low_order);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_str("[link]\nlisten = \"0.0.0.0:4040\"").unwrap();

        assert_eq!(config.exchange.role, ExchangeRole::ReadFirst);
        assert_eq!(config.exchange.settle_ms, 0);
        assert_eq!(config.exchange.timeout_ms, None);
        assert!(!config.exchange.allow_low_order);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_validation() {
        let neither = CliConfig::default();
        assert!(neither.validate().is_err());

        let both = CliConfig::from_str(
            r#"
            [link]
            connect = "10.0.0.1:4040"
            listen = "0.0.0.0:4040"
            "#,
        )
        .unwrap();
        assert!(both.validate().is_err());
    }

    #[test]
    fn test_session_settings_are_checked() {
        let mut config = CliConfig::from_str("[link]\nconnect = \"10.0.0.1:4040\"").unwrap();
        config.exchange.timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_config_mapping() {
        let config = CliConfig::from_str(
            r#"
            [link]
            connect = "10.0.0.1:4040"

            [exchange]
            settle_ms = 1500
            timeout_ms = 5000
            allow_low_order = true
            "#,
        )
        .unwrap();

        let session = config.session_config();
        assert_eq!(session.settle_delay, Duration::from_millis(1500));
        assert_eq!(session.io_timeout, Some(Duration::from_millis(5000)));
        assert!(!session.reject_low_order);
    }
}
