//! Contract for the external messaging client.
//!
//! The bridge never talks to a transport directly. It asks a
//! [`ClientFactory`] for a [`MessagingClient`] keyed by the widget's
//! subscription id, connects it, and registers a [`MessageHandler`] on the
//! `command` channel. Handlers return a [`CommandReply`] that the transport
//! may acknowledge back to the sender.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use ledlight_protocol::CommandReply;

use crate::error::BridgeResult;

/// Boxed future returned by client and handler methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Channel carrying inbound instructions.
pub const COMMAND_CHANNEL: &str = "command";

/// A message received from the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Channel the message arrived on.
    pub channel: String,
    /// Either a string or a structured object.
    pub payload: serde_json::Value,
}

impl InboundMessage {
    pub fn new(channel: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            channel: channel.into(),
            payload,
        }
    }

    /// Creates a message on the command channel.
    pub fn command(payload: serde_json::Value) -> Self {
        Self::new(COMMAND_CHANNEL, payload)
    }
}

/// Callback invoked for every inbound message on a channel.
pub type MessageHandler = Arc<dyn Fn(InboundMessage) -> BoxFuture<'static, CommandReply> + Send + Sync>;

/// A session with the external messaging service.
pub trait MessagingClient: Send + Sync {
    /// Returns the subscription id the client was opened with.
    fn subscription_id(&self) -> &str;

    /// Opens the session.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`](crate::BridgeError) when the transport
    /// refuses or fails the connection.
    fn connect(&self) -> BoxFuture<'_, BridgeResult<()>>;

    /// Releases the session. Must be safe to call on a client that never
    /// connected.
    fn disconnect(&self);

    /// Registers the handler for a channel, replacing any previous one.
    fn on_message(&self, channel: &str, handler: MessageHandler);
}

/// Builds a client for a subscription id.
pub type ClientFactory = Arc<dyn Fn(&str) -> Arc<dyn MessagingClient> + Send + Sync>;
