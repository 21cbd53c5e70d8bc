//! Remote bridge session lifecycle.
//!
//! ```text
//! Idle ──attach──▶ Connecting ──ok──▶ Connected ──detach──▶ Idle
//!                       │
//!                       └──error/timeout──▶ Failed ──detach──▶ Idle
//! ```
//!
//! A failed connection is not retried automatically; the widget stays
//! usable for local control and a later `attach` may try again.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::client::{COMMAND_CHANNEL, ClientFactory, MessagingClient};
use crate::error::BridgeError;
use crate::handler::{CommandHandler, SharedIndicator};

/// Default bound on connection setup.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bridge lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Failed,
}

/// Bridge settings.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// How long to wait for the client's connect acknowledgment.
    pub connect_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Address senders publish instructions to for a subscription.
pub fn command_channel(subscription_id: &str) -> String {
    format!("{subscription_id}/{COMMAND_CHANNEL}")
}

struct Session {
    subscription_id: String,
    client: Arc<dyn MessagingClient>,
}

/// Optional remote-control channel for one widget.
pub struct RemoteBridge {
    widget: SharedIndicator,
    factory: ClientFactory,
    config: BridgeConfig,
    state: BridgeState,
    session: Option<Session>,
    last_error: Option<String>,
}

impl std::fmt::Debug for RemoteBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBridge")
            .field("state", &self.state)
            .field("subscription_id", &self.subscription_id())
            .field("config", &self.config)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl RemoteBridge {
    pub fn new(widget: SharedIndicator, factory: ClientFactory) -> Self {
        Self::with_config(widget, factory, BridgeConfig::default())
    }

    pub fn with_config(widget: SharedIndicator, factory: ClientFactory, config: BridgeConfig) -> Self {
        Self {
            widget,
            factory,
            config,
            state: BridgeState::Idle,
            session: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Subscription id of the open session, if any.
    pub fn subscription_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.subscription_id.as_str())
    }

    /// Message of the last connection failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Opens the session when the widget has a subscription id.
    ///
    /// Connection failures are reported through the widget's `remote-error`
    /// notification and the returned [`BridgeState::Failed`]; they are not
    /// returned as errors.
    ///
    /// If a previous `attach` future was dropped while connecting, the state
    /// is left at [`BridgeState::Connecting`] with no session; the next call
    /// starts a fresh attempt with a new client.
    #[tracing::instrument(skip(self))]
    pub async fn attach(&mut self) -> BridgeState {
        match self.state {
            BridgeState::Connected => {
                debug!("bridge already attached");
                return self.state;
            }
            // `&mut self` rules out a concurrent attempt, so this one was
            // cancelled mid-connect.
            BridgeState::Connecting => debug!("previous connection attempt abandoned"),
            BridgeState::Idle | BridgeState::Failed => {}
        }

        let subscription_id = self.widget.read().await.subscription_id().to_string();
        if subscription_id.is_empty() {
            debug!("no subscription id, remote control disabled");
            self.state = BridgeState::Idle;
            return self.state;
        }

        self.state = BridgeState::Connecting;
        info!(subscription_id = %subscription_id, "connecting remote bridge");
        let client = (self.factory)(subscription_id.as_str());

        let timeout = self.config.connect_timeout;
        let result = match tokio::time::timeout(timeout, client.connect()).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout { timeout }),
        };

        match result {
            Ok(()) => {
                let handler = CommandHandler::new(Arc::clone(&self.widget));
                client.on_message(COMMAND_CHANNEL, handler.into_message_handler());

                let channel = command_channel(&subscription_id);
                {
                    let mut widget = self.widget.write().await;
                    widget.set_remote_connected(true);
                    widget.notify_remote_connected(subscription_id.as_str(), channel.as_str());
                }
                info!(subscription_id = %subscription_id, channel = %channel, "remote bridge connected");

                self.session = Some(Session {
                    subscription_id,
                    client,
                });
                self.last_error = None;
                self.state = BridgeState::Connected;
            }
            Err(e) => {
                error!(subscription_id = %subscription_id, error = %e, "remote bridge connection failed");
                // Abandon the attempt; the client may still hold resources.
                client.disconnect();
                {
                    let mut widget = self.widget.write().await;
                    widget.set_remote_connected(false);
                    widget.notify_remote_error(e.to_string());
                }
                self.last_error = Some(e.to_string());
                self.state = BridgeState::Failed;
            }
        }

        self.state
    }

    /// Releases the session. Safe in every state.
    #[tracing::instrument(skip(self))]
    pub async fn detach(&mut self) {
        if let Some(session) = self.session.take() {
            session.client.disconnect();
            info!(subscription_id = %session.subscription_id, "remote bridge released");
        }
        self.widget.write().await.set_remote_connected(false);
        self.state = BridgeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::new_shared_indicator;
    use crate::loopback::{ConnectBehavior, LoopbackClient};
    use ledlight_core::{Indicator, IndicatorAttributes, WidgetEvent};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn widget(subscription_id: &str) -> SharedIndicator {
        let attrs = IndicatorAttributes::new().subscription_id(subscription_id);
        new_shared_indicator(Indicator::from_attributes(&attrs).unwrap())
    }

    #[tokio::test]
    async fn no_subscription_stays_idle() {
        let client = Arc::new(LoopbackClient::new(""));
        let mut bridge = RemoteBridge::new(widget(""), LoopbackClient::factory(&client));

        assert_eq!(bridge.attach().await, BridgeState::Idle);
        assert_eq!(client.connect_count(), 0);
    }

    #[tokio::test]
    async fn connect_registers_command_handler() {
        let shared = widget("lamp1");
        let mut events = shared.read().await.subscribe();
        let client = Arc::new(LoopbackClient::new("lamp1"));
        let mut bridge = RemoteBridge::new(shared.clone(), LoopbackClient::factory(&client));

        assert_eq!(bridge.attach().await, BridgeState::Connected);
        assert_eq!(bridge.subscription_id(), Some("lamp1"));
        assert!(client.has_handler(COMMAND_CHANNEL));
        assert!(shared.read().await.remote_connected());
        assert_eq!(
            events.try_recv().unwrap(),
            WidgetEvent::RemoteConnected {
                subscription_id: "lamp1".to_string(),
                channel: "lamp1/command".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn inbound_off_after_connect() {
        let attrs = IndicatorAttributes::new()
            .subscription_id("lamp1")
            .power(true)
            .color("blue")
            .diameter(42.0);
        let shared = new_shared_indicator(Indicator::from_attributes(&attrs).unwrap());
        let client = Arc::new(LoopbackClient::new("lamp1"));
        let mut bridge = RemoteBridge::new(shared.clone(), LoopbackClient::factory(&client));
        bridge.attach().await;

        let reply = client.deliver(COMMAND_CHANNEL, json!("off()")).await.unwrap();

        let state = shared.read().await.state();
        assert!(!state.power);
        assert_eq!(state.color, "blue");
        assert_eq!(state.diameter, 42.0);
        assert!(state.remote_connected);
        assert!(reply.success);
        assert_eq!(reply.state, Some(state.clone()));
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({
                "success": true,
                "state": {"power": false, "color": "blue", "diameter": 42.0, "mqttConnected": true}
            })
        );
    }

    #[tokio::test]
    async fn inbound_number_is_not_dispatched() {
        let shared = widget("lamp1");
        let client = Arc::new(LoopbackClient::new("lamp1"));
        let mut bridge = RemoteBridge::new(shared.clone(), LoopbackClient::factory(&client));
        bridge.attach().await;
        let before = shared.read().await.state();

        let reply = client.deliver(COMMAND_CHANNEL, json!(42)).await.unwrap();

        assert!(!reply.success);
        assert_eq!(shared.read().await.state(), before);
    }

    #[tokio::test]
    async fn refused_connect_fails_and_notifies() {
        let shared = widget("lamp1");
        let mut events = shared.read().await.subscribe();
        let client = Arc::new(LoopbackClient::with_behavior(
            "lamp1",
            ConnectBehavior::Refuse("broker unreachable".to_string()),
        ));
        let mut bridge = RemoteBridge::new(shared.clone(), LoopbackClient::factory(&client));

        assert_eq!(bridge.attach().await, BridgeState::Failed);
        assert_eq!(bridge.last_error(), Some("connection failed: broker unreachable"));
        assert!(!shared.read().await.remote_connected());
        assert!(!client.has_handler(COMMAND_CHANNEL));
        assert_eq!(
            events.try_recv().unwrap(),
            WidgetEvent::RemoteError {
                error: "connection failed: broker unreachable".to_string()
            }
        );

        // Local control keeps working.
        shared.write().await.click();
        assert!(shared.read().await.power());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_connect_times_out() {
        let shared = widget("lamp1");
        let client = Arc::new(LoopbackClient::with_behavior("lamp1", ConnectBehavior::Stall));
        let config = BridgeConfig::default().with_connect_timeout(Duration::from_secs(2));
        let mut bridge =
            RemoteBridge::with_config(shared.clone(), LoopbackClient::factory(&client), config);

        assert_eq!(bridge.attach().await, BridgeState::Failed);
        assert_eq!(
            bridge.last_error(),
            Some("connection timed out after 2s")
        );
        assert!(!shared.read().await.remote_connected());
    }

    #[tokio::test]
    async fn detach_releases_session() {
        let shared = widget("lamp1");
        let client = Arc::new(LoopbackClient::new("lamp1"));
        let mut bridge = RemoteBridge::new(shared.clone(), LoopbackClient::factory(&client));
        bridge.attach().await;

        bridge.detach().await;

        assert_eq!(bridge.state(), BridgeState::Idle);
        assert_eq!(bridge.subscription_id(), None);
        assert!(!shared.read().await.remote_connected());
        assert!(!client.is_connected());
        assert_eq!(client.disconnect_count(), 1);
        assert_eq!(
            client.deliver(COMMAND_CHANNEL, json!("on")).await,
            Err(BridgeError::NotConnected)
        );
    }

    #[tokio::test]
    async fn detach_is_safe_in_every_state() {
        let client = Arc::new(LoopbackClient::new("lamp1"));
        let mut bridge = RemoteBridge::new(widget(""), LoopbackClient::factory(&client));
        bridge.detach().await;
        bridge.detach().await;
        assert_eq!(bridge.state(), BridgeState::Idle);
        assert_eq!(client.disconnect_count(), 0);
    }

    #[tokio::test]
    async fn attach_twice_keeps_one_session() {
        let client = Arc::new(LoopbackClient::new("lamp1"));
        let mut bridge = RemoteBridge::new(widget("lamp1"), LoopbackClient::factory(&client));
        bridge.attach().await;
        assert_eq!(bridge.attach().await, BridgeState::Connected);
        assert_eq!(client.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_attach_can_be_retried() {
        let stalled = Arc::new(LoopbackClient::with_behavior("lamp1", ConnectBehavior::Stall));
        let ready = Arc::new(LoopbackClient::new("lamp1"));
        let calls = Arc::new(AtomicUsize::new(0));
        let factory: ClientFactory = {
            let (stalled, ready, calls) = (stalled.clone(), ready.clone(), calls.clone());
            Arc::new(move |_: &str| -> Arc<dyn MessagingClient> {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    stalled.clone()
                } else {
                    ready.clone()
                }
            })
        };
        let mut bridge = RemoteBridge::new(widget("lamp1"), factory);

        let first = tokio::time::timeout(Duration::from_millis(50), bridge.attach()).await;
        assert!(first.is_err());
        assert_eq!(bridge.state(), BridgeState::Connecting);

        assert_eq!(bridge.attach().await, BridgeState::Connected);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(ready.has_handler(COMMAND_CHANNEL));
    }

    #[tokio::test]
    async fn subscription_change_applies_on_reattach() {
        let shared = widget("lamp1");
        let client = Arc::new(LoopbackClient::new("any"));
        let mut bridge = RemoteBridge::new(shared.clone(), LoopbackClient::factory(&client));
        bridge.attach().await;

        shared
            .write()
            .await
            .set_attribute("subscription-id", Some("lamp2"))
            .unwrap();
        assert_eq!(bridge.subscription_id(), Some("lamp1"));

        bridge.detach().await;
        bridge.attach().await;
        assert_eq!(bridge.subscription_id(), Some("lamp2"));
    }

    #[test]
    fn command_channel_address() {
        assert_eq!(command_channel("lamp1"), "lamp1/command");
    }
}
