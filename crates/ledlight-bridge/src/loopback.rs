//! In-memory messaging client.
//!
//! Delivers messages from the same process instead of a transport. Used by
//! tests to simulate connect outcomes and by the CLI `exec` command.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use ledlight_protocol::CommandReply;
use tracing::debug;

use crate::client::{BoxFuture, ClientFactory, InboundMessage, MessageHandler, MessagingClient};
use crate::error::{BridgeError, BridgeResult};

/// How [`MessagingClient::connect`] behaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectBehavior {
    /// Connect succeeds immediately.
    #[default]
    Accept,
    /// Connect fails with this message.
    Refuse(String),
    /// Connect never completes.
    Stall,
}

/// A messaging client that lives entirely in memory.
#[derive(Default)]
pub struct LoopbackClient {
    subscription_id: String,
    behavior: ConnectBehavior,
    handlers: Mutex<HashMap<String, MessageHandler>>,
    connected: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl std::fmt::Debug for LoopbackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackClient")
            .field("subscription_id", &self.subscription_id)
            .field("behavior", &self.behavior)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl LoopbackClient {
    /// Creates a client whose connect succeeds.
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self::with_behavior(subscription_id, ConnectBehavior::Accept)
    }

    pub fn with_behavior(subscription_id: impl Into<String>, behavior: ConnectBehavior) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            behavior,
            ..Default::default()
        }
    }

    /// Returns a factory that hands out this client for any subscription id.
    pub fn factory(client: &Arc<Self>) -> ClientFactory {
        let client = Arc::clone(client);
        Arc::new(move |subscription_id: &str| -> Arc<dyn MessagingClient> {
            debug!(subscription_id, "opening loopback client");
            client.clone()
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Returns true if a handler is registered for the channel.
    pub fn has_handler(&self, channel: &str) -> bool {
        self.handlers().contains_key(channel)
    }

    /// Delivers a payload on a channel and returns the handler's reply.
    ///
    /// # Errors
    ///
    /// Fails if the client is not connected or nothing listens on the
    /// channel.
    pub async fn deliver(
        &self,
        channel: &str,
        payload: serde_json::Value,
    ) -> BridgeResult<CommandReply> {
        if !self.is_connected() {
            return Err(BridgeError::NotConnected);
        }
        let handler = self
            .handlers()
            .get(channel)
            .cloned()
            .ok_or_else(|| BridgeError::NoHandler(channel.to_string()))?;
        Ok(handler(InboundMessage::new(channel, payload)).await)
    }

    fn handlers(&self) -> std::sync::MutexGuard<'_, HashMap<String, MessageHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MessagingClient for LoopbackClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    fn connect(&self) -> BoxFuture<'_, BridgeResult<()>> {
        Box::pin(async move {
            self.connects.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                ConnectBehavior::Accept => {
                    self.connected.store(true, Ordering::SeqCst);
                    Ok(())
                }
                ConnectBehavior::Refuse(message) => Err(BridgeError::connection(message.clone())),
                ConnectBehavior::Stall => std::future::pending().await,
            }
        })
    }

    fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        self.handlers().clear();
    }

    fn on_message(&self, channel: &str, handler: MessageHandler) {
        self.handlers().insert(channel.to_string(), handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::COMMAND_CHANNEL;
    use serde_json::json;

    #[tokio::test]
    async fn deliver_requires_connection() {
        let client = LoopbackClient::new("lamp1");
        assert_eq!(
            client.deliver(COMMAND_CHANNEL, json!("on")).await,
            Err(BridgeError::NotConnected)
        );
    }

    #[tokio::test]
    async fn deliver_requires_handler() {
        let client = LoopbackClient::new("lamp1");
        client.connect().await.unwrap();
        assert_eq!(
            client.deliver("status", json!("on")).await,
            Err(BridgeError::NoHandler("status".to_string()))
        );
    }

    #[tokio::test]
    async fn refused_connect() {
        let client =
            LoopbackClient::with_behavior("lamp1", ConnectBehavior::Refuse("denied".into()));
        assert_eq!(
            client.connect().await,
            Err(BridgeError::Connection("denied".to_string()))
        );
        assert!(!client.is_connected());
        assert_eq!(client.connect_count(), 1);
    }

    #[tokio::test]
    async fn disconnect_drops_handlers() {
        let client = LoopbackClient::new("lamp1");
        client.connect().await.unwrap();
        client.on_message(
            COMMAND_CHANNEL,
            Arc::new(|_msg: InboundMessage| -> BoxFuture<'static, CommandReply> {
                Box::pin(async { CommandReply::failure("unused") })
            }),
        );
        assert!(client.has_handler(COMMAND_CHANNEL));

        client.disconnect();
        assert!(!client.is_connected());
        assert!(!client.has_handler(COMMAND_CHANNEL));
        assert_eq!(client.disconnect_count(), 1);
    }
}
