//! LED indicator widget: state, notifications, rendering and element registry.

pub mod error;
pub mod event;
pub mod registry;
pub mod render;
pub mod state;
pub mod tracing;
pub mod widget;

pub use error::{RegistryError, RegistryResult, WidgetError, WidgetResult};
pub use event::{EVENT_CAPACITY, EventBus, WidgetEvent};
pub use registry::{ElementRegistry, LED_LIGHT_TAG, register_led_light};
pub use render::{STYLES, render};
pub use state::{
    DEFAULT_COLOR, DEFAULT_DIAMETER, IndicatorAttributes, IndicatorState, StateSnapshot,
    parse_diameter, validate_diameter,
};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use widget::{Indicator, OBSERVED_ATTRIBUTES};
