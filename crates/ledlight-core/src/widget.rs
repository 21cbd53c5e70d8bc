//! The LED indicator widget.
//!
//! [`Indicator`] owns an [`IndicatorState`], exposes the five control
//! operations and emits a [`WidgetEvent::Change`] after each of them.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{WidgetError, WidgetResult};
use crate::event::{EventBus, WidgetEvent};
use crate::render;
use crate::state::{
    IndicatorAttributes, IndicatorState, StateSnapshot, parse_diameter, validate_diameter,
};

/// Attribute names observed by the widget.
pub const OBSERVED_ATTRIBUTES: &[&str] = &["power", "color", "diameter", "subscription-id"];

/// A colored circular on/off indicator.
#[derive(Debug, Default)]
pub struct Indicator {
    state: IndicatorState,
    events: EventBus,
}

impl Indicator {
    /// Creates an indicator with default state (off, red, 30px, no remote).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an indicator from creation-time attributes.
    pub fn from_attributes(attrs: &IndicatorAttributes) -> WidgetResult<Self> {
        let diameter = validate_diameter(attrs.diameter)?;
        Ok(Self {
            state: IndicatorState {
                power: attrs.power,
                color: attrs.color.clone(),
                diameter,
                subscription_id: attrs.subscription_id.clone(),
                remote_connected: false,
            },
            events: EventBus::new(),
        })
    }

    /// Returns the full internal state.
    pub fn inner(&self) -> &IndicatorState {
        &self.state
    }

    pub fn power(&self) -> bool {
        self.state.power
    }

    pub fn color(&self) -> &str {
        &self.state.color
    }

    pub fn diameter(&self) -> f64 {
        self.state.diameter
    }

    pub fn subscription_id(&self) -> &str {
        &self.state.subscription_id
    }

    pub fn remote_connected(&self) -> bool {
        self.state.remote_connected
    }

    /// Returns the current attribute values.
    pub fn attributes(&self) -> IndicatorAttributes {
        IndicatorAttributes {
            power: self.state.power,
            color: self.state.color.clone(),
            diameter: self.state.diameter,
            subscription_id: self.state.subscription_id.clone(),
        }
    }

    /// Subscribes to notifications emitted by this widget.
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    /// Lights the indicator.
    pub fn turn_on(&mut self) {
        self.state.power = true;
        debug!("indicator on");
        self.emit_change();
    }

    /// Switches the indicator off.
    pub fn turn_off(&mut self) {
        self.state.power = false;
        debug!("indicator off");
        self.emit_change();
    }

    /// Inverts the power state.
    pub fn toggle(&mut self) {
        self.state.power = !self.state.power;
        debug!(power = self.state.power, "indicator toggled");
        self.emit_change();
    }

    /// Replaces the color verbatim.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.state.color = color.into();
        debug!(color = %self.state.color, "indicator color set");
        self.emit_change();
    }

    /// Replaces the diameter.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidDiameter`] for NaN, infinite or
    /// non-positive values; the state is left unchanged.
    pub fn set_size(&mut self, diameter: f64) -> WidgetResult<()> {
        self.state.diameter = validate_diameter(diameter)?;
        debug!(diameter = self.state.diameter, "indicator size set");
        self.emit_change();
        Ok(())
    }

    /// Coerces textual input to a number and replaces the diameter.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidDiameter`] when the text is not a
    /// positive decimal number.
    pub fn set_size_str(&mut self, input: &str) -> WidgetResult<()> {
        let diameter = parse_diameter(input)?;
        self.set_size(diameter)
    }

    /// Returns a snapshot of the visible state. No side effects.
    pub fn state(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Handles a user click on the rendered shape.
    pub fn click(&mut self) {
        self.toggle();
    }

    /// Applies a runtime attribute assignment; `None` removes the attribute.
    ///
    /// Attribute assignment re-renders but does not emit `change`.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> WidgetResult<()> {
        match name {
            "power" => self.state.power = value.is_some(),
            "color" => {
                self.state.color = value.unwrap_or(crate::state::DEFAULT_COLOR).to_string();
            }
            "diameter" => {
                self.state.diameter = match value {
                    Some(raw) => parse_diameter(raw)?,
                    None => crate::state::DEFAULT_DIAMETER,
                };
            }
            "subscription-id" => {
                let id = value.unwrap_or_default();
                if self.state.remote_connected && id != self.state.subscription_id {
                    warn!(
                        current = %self.state.subscription_id,
                        requested = %id,
                        "subscription id changed while connected; takes effect on next attach"
                    );
                }
                self.state.subscription_id = id.to_string();
            }
            other => return Err(WidgetError::UnknownAttribute(other.to_string())),
        }
        debug!(attribute = name, ?value, "attribute assigned");
        Ok(())
    }

    /// Records the remote session status.
    pub fn set_remote_connected(&mut self, connected: bool) {
        if self.state.remote_connected != connected {
            info!(connected, "remote status changed");
        }
        self.state.remote_connected = connected;
    }

    /// Emits `remote-connected`.
    pub fn notify_remote_connected(
        &self,
        subscription_id: impl Into<String>,
        channel: impl Into<String>,
    ) {
        self.events.emit(WidgetEvent::RemoteConnected {
            subscription_id: subscription_id.into(),
            channel: channel.into(),
        });
    }

    /// Emits `remote-error`.
    pub fn notify_remote_error(&self, error: impl Into<String>) {
        self.events.emit(WidgetEvent::RemoteError {
            error: error.into(),
        });
    }

    /// Renders the current state as markup.
    pub fn render(&self) -> String {
        render::render(&self.state)
    }

    fn emit_change(&self) {
        self.events.emit(WidgetEvent::Change {
            power: self.state.power,
            color: self.state.color.clone(),
            diameter: self.state.diameter,
        });
    }
}
