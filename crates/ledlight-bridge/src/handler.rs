//! Inbound command handling.

use std::sync::Arc;

use ledlight_core::Indicator;
use ledlight_protocol::{CommandReply, execute};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::client::{BoxFuture, InboundMessage, MessageHandler};

/// Indicator shared between the host, the bridge and message handlers.
pub type SharedIndicator = Arc<RwLock<Indicator>>;

/// Wraps an indicator for sharing.
pub fn new_shared_indicator(indicator: Indicator) -> SharedIndicator {
    Arc::new(RwLock::new(indicator))
}

/// Feeds inbound messages to the command interpreter.
///
/// Failures never escape: they are logged and returned as
/// `{success: false, error}`.
#[derive(Clone)]
pub struct CommandHandler {
    widget: SharedIndicator,
}

impl CommandHandler {
    pub fn new(widget: SharedIndicator) -> Self {
        Self { widget }
    }

    /// Interprets and dispatches one message.
    #[tracing::instrument(skip(self, message), fields(channel = %message.channel))]
    pub async fn handle(&self, message: &InboundMessage) -> CommandReply {
        debug!(payload = %message.payload, "inbound instruction");
        let mut widget = self.widget.write().await;
        match execute(&mut widget, &message.payload) {
            Ok(state) => CommandReply::ok(state),
            Err(e) => {
                warn!(error = %e, payload = %message.payload, "instruction failed");
                CommandReply::failure(e)
            }
        }
    }

    /// Converts the handler into a callback for
    /// [`MessagingClient::on_message`](crate::MessagingClient::on_message).
    pub fn into_message_handler(self) -> MessageHandler {
        Arc::new(
            move |message: InboundMessage| -> BoxFuture<'static, CommandReply> {
                let handler = self.clone();
                Box::pin(async move { handler.handle(&message).await })
            },
        )
    }
}
