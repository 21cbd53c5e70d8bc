//! CLI configuration.
//!
//! Settings live in `~/.config/ledlight/config.toml` by default:
//!
//! ```toml
//! debug = false
//!
//! [light]
//! power = false
//! color = "red"
//! diameter = 30
//! subscription_id = "lamp1"
//!
//! [bridge]
//! connect_timeout = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ledlight_bridge::BridgeConfig;
use ledlight_core::{IndicatorAttributes, validate_diameter};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Configuration for the `ledlight` binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Debug logging.
    pub debug: bool,

    /// Creation-time attributes of the indicator.
    pub light: IndicatorAttributes,

    /// Remote bridge settings.
    pub bridge: BridgeSettings,
}

/// Remote bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Seconds to wait for the messaging client to connect.
    pub connect_timeout: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: ledlight_bridge::DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl BridgeSettings {
    pub fn to_bridge_config(&self) -> BridgeConfig {
        BridgeConfig::default().with_connect_timeout(Duration::from_secs(self.connect_timeout))
    }
}

impl CliConfig {
    /// Loads the default file, or defaults when it does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads a specific file.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| CliError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ledlight")
    }

    /// Applies command-line overrides on top of the file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.debug {
            self.debug = true;
        }
        if cli.power {
            self.light.power = true;
        }
        if let Some(ref color) = cli.color {
            self.light.color = color.clone();
        }
        if let Some(diameter) = cli.diameter {
            self.light.diameter = diameter;
        }
        if let Some(ref id) = cli.subscription_id {
            self.light.subscription_id = id.clone();
        }
        if let Some(timeout) = cli.connect_timeout {
            self.bridge.connect_timeout = timeout;
        }
    }

    /// Checks values the indicator and bridge would reject later.
    pub fn validate(&self) -> CliResult<()> {
        validate_diameter(self.light.diameter)
            .map_err(|e| CliError::config(format!("light.diameter: {e}")))?;
        if self.bridge.connect_timeout == 0 {
            return Err(CliError::config("bridge.connect_timeout must be at least 1"));
        }
        if self.light.subscription_id.chars().any(char::is_whitespace) {
            return Err(CliError::config(
                "light.subscription_id must not contain whitespace",
            ));
        }
        Ok(())
    }
}
