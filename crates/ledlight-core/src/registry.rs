//! Element registry.
//!
//! Associates tag names with element constructors. The registry is an
//! ordinary value: applications create one at start-up and call
//! [`register_led_light`] once, while tests construct indicators directly
//! without touching any shared registry.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{RegistryError, RegistryResult, WidgetResult};
use crate::state::IndicatorAttributes;
use crate::widget::Indicator;

/// Tag name of the LED indicator element.
pub const LED_LIGHT_TAG: &str = "led-light";

/// Builds an indicator from its attributes.
pub type ElementConstructor = fn(&IndicatorAttributes) -> WidgetResult<Indicator>;

/// Tag name → constructor table.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    definitions: HashMap<String, ElementConstructor>,
}

impl ElementRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a tag.
    ///
    /// # Errors
    ///
    /// Fails if the name is not a valid custom element name or is already
    /// defined.
    pub fn define(&mut self, tag: &str, constructor: ElementConstructor) -> RegistryResult<()> {
        if !is_valid_element_name(tag) {
            return Err(RegistryError::InvalidName(tag.to_string()));
        }
        if self.definitions.contains_key(tag) {
            return Err(RegistryError::AlreadyDefined(tag.to_string()));
        }
        self.definitions.insert(tag.to_string(), constructor);
        debug!(tag, "element defined");
        Ok(())
    }

    /// Returns true if the tag is defined.
    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Constructs an element for a defined tag.
    pub fn create(&self, tag: &str, attrs: &IndicatorAttributes) -> RegistryResult<Indicator> {
        let constructor = self
            .definitions
            .get(tag)
            .ok_or_else(|| RegistryError::Undefined(tag.to_string()))?;
        Ok(constructor(attrs)?)
    }
}

/// Defines the `led-light` element on the given registry.
pub fn register_led_light(registry: &mut ElementRegistry) -> RegistryResult<()> {
    registry.define(LED_LIGHT_TAG, Indicator::from_attributes)
}

/// Custom element names start with a lowercase ASCII letter, contain a
/// hyphen, and use only lowercase letters, digits, `-`, `.` and `_`.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_lower = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    starts_lower
        && name.contains('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_create() {
        let mut registry = ElementRegistry::new();
        register_led_light(&mut registry).unwrap();
        assert!(registry.is_defined("led-light"));

        let led = registry
            .create("led-light", &IndicatorAttributes::new().color("blue"))
            .unwrap();
        assert_eq!(led.color(), "blue");
    }

    #[test]
    fn second_registration_fails() {
        let mut registry = ElementRegistry::new();
        register_led_light(&mut registry).unwrap();
        assert_eq!(
            register_led_light(&mut registry),
            Err(RegistryError::AlreadyDefined("led-light".to_string()))
        );
    }

    #[test]
    fn registries_are_isolated() {
        let mut first = ElementRegistry::new();
        register_led_light(&mut first).unwrap();
        let second = ElementRegistry::new();
        assert!(!second.is_defined(LED_LIGHT_TAG));
        assert!(matches!(
            second.create(LED_LIGHT_TAG, &IndicatorAttributes::new()),
            Err(RegistryError::Undefined(_))
        ));
    }

    #[test]
    fn invalid_names() {
        for name in ["led", "Led-light", "1-led", "-led", "led light", ""] {
            assert!(!is_valid_element_name(name), "{name:?}");
        }
        assert!(is_valid_element_name("led-light"));
        assert!(is_valid_element_name("x-2.0_b"));

        let mut registry = ElementRegistry::new();
        assert_eq!(
            registry.define("led", Indicator::from_attributes),
            Err(RegistryError::InvalidName("led".to_string()))
        );
    }

    #[test]
    fn constructor_errors_propagate() {
        let mut registry = ElementRegistry::new();
        register_led_light(&mut registry).unwrap();
        let result = registry.create("led-light", &IndicatorAttributes::new().diameter(0.0));
        assert!(matches!(result, Err(RegistryError::Construct(_))));
    }
}
