//! Subcommand implementations.

pub mod config;
pub mod exec;
pub mod listen;
pub mod render;

use ledlight_core::{ElementRegistry, Indicator, IndicatorAttributes, LED_LIGHT_TAG, register_led_light};

use crate::error::CliResult;

/// Creates an indicator through the element registry, the same way a page
/// would instantiate `<led-light>`.
pub fn create_indicator(attributes: &IndicatorAttributes) -> CliResult<Indicator> {
    let mut registry = ElementRegistry::new();
    register_led_light(&mut registry)?;
    Ok(registry.create(LED_LIGHT_TAG, attributes)?)
}
