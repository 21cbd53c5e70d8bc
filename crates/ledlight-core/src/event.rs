//! Notifications emitted by the indicator.
//!
//! Every notification bubbles to all subscribers of the widget's
//! [`EventBus`] and is visible outside the component, which is how hosts
//! observe state changes and remote session transitions.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Buffered notifications per subscriber before the oldest are dropped.
pub const EVENT_CAPACITY: usize = 64;

/// A notification crossing the widget boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetEvent {
    /// Emitted after every control operation.
    Change {
        power: bool,
        color: String,
        diameter: f64,
    },

    /// Emitted once the remote bridge finished connecting.
    #[serde(rename_all = "camelCase")]
    RemoteConnected {
        subscription_id: String,
        channel: String,
    },

    /// Emitted when the remote bridge failed to connect.
    RemoteError { error: String },
}

impl WidgetEvent {
    /// Returns the notification name as seen by hosts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Change { .. } => "change",
            Self::RemoteConnected { .. } => "remote-connected",
            Self::RemoteError { .. } => "remote-error",
        }
    }

    /// Notifications propagate to every enclosing listener.
    pub fn bubbles(&self) -> bool {
        true
    }

    /// Notifications cross the component's encapsulation boundary.
    pub fn composed(&self) -> bool {
        true
    }
}

/// Fan-out channel for widget notifications.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WidgetEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus with [`EVENT_CAPACITY`] slots.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Returns a receiver for all notifications emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.tx.subscribe()
    }

    /// Emits a notification and returns how many subscribers received it.
    pub fn emit(&self, event: WidgetEvent) -> usize {
        let name = event.name();
        // No subscriber is fine; the notification is simply unobserved.
        let delivered = self.tx.send(event).unwrap_or(0);
        trace!(event = name, delivered, "notification emitted");
        delivered
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
