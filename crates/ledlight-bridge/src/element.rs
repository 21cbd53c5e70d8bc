//! Host-facing element: a shared indicator plus its remote bridge.
//!
//! Hosts call [`LedLightElement::connected_callback`] when the element
//! becomes active and [`LedLightElement::disconnected_callback`] when it is
//! removed; the bridge follows those transitions.

use ledlight_core::{Indicator, StateSnapshot, WidgetEvent};
use tokio::sync::broadcast;

use crate::client::ClientFactory;
use crate::handler::{SharedIndicator, new_shared_indicator};
use crate::remote::{BridgeConfig, BridgeState, RemoteBridge};

#[derive(Debug)]
pub struct LedLightElement {
    widget: SharedIndicator,
    bridge: RemoteBridge,
}

impl LedLightElement {
    pub fn new(indicator: Indicator, factory: ClientFactory) -> Self {
        Self::with_config(indicator, factory, BridgeConfig::default())
    }

    pub fn with_config(indicator: Indicator, factory: ClientFactory, config: BridgeConfig) -> Self {
        let widget = new_shared_indicator(indicator);
        let bridge = RemoteBridge::with_config(widget.clone(), factory, config);
        Self { widget, bridge }
    }

    /// Returns a handle to the shared indicator.
    pub fn widget(&self) -> SharedIndicator {
        self.widget.clone()
    }

    pub fn bridge(&self) -> &RemoteBridge {
        &self.bridge
    }

    /// The element became active in its host: open the bridge if a
    /// subscription id is set.
    pub async fn connected_callback(&mut self) -> BridgeState {
        self.bridge.attach().await
    }

    /// The element was removed from its host: release the bridge.
    pub async fn disconnected_callback(&mut self) {
        self.bridge.detach().await;
    }

    /// Forwards a user click to the indicator.
    pub async fn click(&self) {
        self.widget.write().await.click();
    }

    pub async fn state(&self) -> StateSnapshot {
        self.widget.read().await.state()
    }

    pub async fn render(&self) -> String {
        self.widget.read().await.render()
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.widget.read().await.subscribe()
    }
}
