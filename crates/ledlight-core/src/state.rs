//! Indicator state, snapshots and creation-time attributes.

use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

/// Default fill color.
pub const DEFAULT_COLOR: &str = "red";

/// Default diameter in pixels.
pub const DEFAULT_DIAMETER: f64 = 30.0;

/// Full state owned by an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorState {
    /// Whether the indicator is lit.
    pub power: bool,
    /// CSS color token, kept verbatim.
    pub color: String,
    /// Display size in pixels, always finite and positive.
    pub diameter: f64,
    /// Remote session key; empty disables remote control.
    pub subscription_id: String,
    /// True while a remote session is established.
    pub remote_connected: bool,
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self {
            power: false,
            color: DEFAULT_COLOR.to_string(),
            diameter: DEFAULT_DIAMETER,
            subscription_id: String::new(),
            remote_connected: false,
        }
    }
}

impl IndicatorState {
    /// Returns true if a subscription id is configured.
    pub fn has_subscription(&self) -> bool {
        !self.subscription_id.is_empty()
    }

    /// Returns a read-only snapshot of the visible state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            power: self.power,
            color: self.color.clone(),
            diameter: self.diameter,
            remote_connected: self.remote_connected,
        }
    }
}

/// Snapshot returned by `getState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub power: bool,
    pub color: String,
    pub diameter: f64,
    #[serde(rename = "mqttConnected", alias = "remoteConnected")]
    pub remote_connected: bool,
}

/// Attributes recognized at creation time (and from configuration files).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorAttributes {
    /// Initial light state.
    pub power: bool,
    /// Initial fill color.
    pub color: String,
    /// Initial size in pixels.
    pub diameter: f64,
    /// Enables the remote bridge when non-empty.
    #[serde(alias = "subscription-id")]
    pub subscription_id: String,
}

impl Default for IndicatorAttributes {
    fn default() -> Self {
        Self {
            power: false,
            color: DEFAULT_COLOR.to_string(),
            diameter: DEFAULT_DIAMETER,
            subscription_id: String::new(),
        }
    }
}

impl IndicatorAttributes {
    /// Creates the default attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set initial power.
    pub fn power(mut self, power: bool) -> Self {
        self.power = power;
        self
    }

    /// Builder: set initial color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Builder: set initial diameter.
    pub fn diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }

    /// Builder: set the subscription id.
    pub fn subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = id.into();
        self
    }
}

/// Validates a numeric diameter.
pub fn validate_diameter(value: f64) -> WidgetResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WidgetError::invalid_diameter(value.to_string()))
    }
}

/// Coerces textual input (e.g. `" 60 "`, `"12.5"`) to a diameter.
pub fn parse_diameter(input: &str) -> WidgetResult<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| WidgetError::invalid_diameter(input))?;
    validate_diameter(value).map_err(|_| WidgetError::invalid_diameter(input))
}
