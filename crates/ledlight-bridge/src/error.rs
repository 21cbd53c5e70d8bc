//! Bridge error types.

use std::time::Duration;

use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised by the remote bridge and messaging clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The messaging client failed to establish a session.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The messaging client did not acknowledge in time.
    #[error("connection timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// A message was delivered while no session is open.
    #[error("not connected")]
    NotConnected,

    /// No handler is registered for the channel.
    #[error("no handler registered for channel: {0}")]
    NoHandler(String),
}

impl BridgeError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}
