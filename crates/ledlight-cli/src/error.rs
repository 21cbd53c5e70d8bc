//! CLI error types.

use ledlight_bridge::BridgeError;
use ledlight_core::{RegistryError, WidgetError};
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced by the `ledlight` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read, parsed or validated.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("widget error: {0}")]
    Widget(#[from] WidgetError),

    #[error("element error: {0}")]
    Registry(#[from] RegistryError),

    /// The remote bridge ended in a state other than connected.
    #[error("remote bridge not connected: {0}")]
    NotConnected(String),

    #[error("{0} instruction(s) failed")]
    InstructionsFailed(usize),
}

impl CliError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
