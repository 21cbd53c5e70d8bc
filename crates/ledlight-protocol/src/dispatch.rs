//! The closed dispatch table from method names to widget operations.

use ledlight_core::{Indicator, StateSnapshot, WidgetError};
use tracing::debug;

use crate::error::{CommandResult, DispatchError};
use crate::interpreter::interpret;
use crate::types::{CommandReply, Instruction, Value};

/// Method names accepted by [`Operation::resolve`].
pub const METHODS: &[&str] = &["on", "off", "toggle", "setColor", "setSize", "getState"];

/// A resolved widget operation.
///
/// Argument-taking operations hold `None` when the instruction carried no
/// usable argument; applying them is then a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    On,
    Off,
    Toggle,
    SetColor(Option<String>),
    SetSize(Option<Value>),
    GetState,
}

impl Operation {
    /// Looks up the instruction's method in the dispatch table.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownMethod`] for names outside the table.
    pub fn resolve(instruction: &Instruction) -> Result<Self, DispatchError> {
        let first = instruction.params.first();
        match instruction.method.as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "toggle" => Ok(Self::Toggle),
            "setColor" => Ok(Self::SetColor(
                first.map(Value::to_string).filter(|c| !c.is_empty()),
            )),
            "setSize" => Ok(Self::SetSize(first.cloned())),
            "getState" => Ok(Self::GetState),
            other => Err(DispatchError::UnknownMethod(other.to_string())),
        }
    }

    /// Returns the method name this operation is dispatched under.
    pub fn method(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "toggle",
            Self::SetColor(_) => "setColor",
            Self::SetSize(_) => "setSize",
            Self::GetState => "getState",
        }
    }

    /// Returns false for read-only operations.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::GetState)
    }

    /// Applies the operation and returns the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Widget`] when the widget rejects the
    /// argument (e.g. a non-numeric size); the state is left unchanged.
    pub fn apply(self, widget: &mut Indicator) -> Result<StateSnapshot, DispatchError> {
        debug!(method = self.method(), "dispatching");
        match self {
            Self::On => widget.turn_on(),
            Self::Off => widget.turn_off(),
            Self::Toggle => widget.toggle(),
            Self::SetColor(Some(color)) => widget.set_color(color),
            Self::SetSize(Some(Value::Number(n))) => widget.set_size(n)?,
            Self::SetSize(Some(Value::Text(s))) => widget.set_size_str(&s)?,
            Self::SetSize(Some(Value::Bool(b))) => {
                return Err(WidgetError::invalid_diameter(b.to_string()).into());
            }
            Self::SetColor(None) | Self::SetSize(None) => {
                debug!("no argument given, operation skipped");
            }
            Self::GetState => {}
        }
        Ok(widget.state())
    }
}

/// Interprets a payload and applies it to the widget.
///
/// # Errors
///
/// Returns the interpret or dispatch failure; nothing is mutated in that
/// case.
pub fn execute(widget: &mut Indicator, payload: &serde_json::Value) -> CommandResult<StateSnapshot> {
    let instruction = interpret(payload)?;
    let operation = Operation::resolve(&instruction)?;
    Ok(operation.apply(widget)?)
}

/// Like [`execute`], but folds the outcome into a [`CommandReply`].
pub fn execute_reply(widget: &mut Indicator, payload: &serde_json::Value) -> CommandReply {
    match execute(widget, payload) {
        Ok(state) => CommandReply::ok(state),
        Err(e) => CommandReply::failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CommandError, InterpretError};
    use ledlight_core::IndicatorAttributes;
    use serde_json::json;

    #[test]
    fn table_covers_every_method() {
        for method in METHODS {
            let op = Operation::resolve(&Instruction::bare(*method)).unwrap();
            assert_eq!(op.method(), *method);
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = Operation::resolve(&Instruction::bare("explode")).unwrap_err();
        assert_eq!(err, DispatchError::UnknownMethod("explode".to_string()));
        assert_eq!(err.to_string(), "unknown method: explode");
    }

    #[test]
    fn set_size_dispatches_number() {
        let op = Operation::resolve(&crate::parse_command("setSize(60)")).unwrap();
        assert_eq!(op, Operation::SetSize(Some(Value::Number(60.0))));

        let mut led = Indicator::new();
        let state = op.apply(&mut led).unwrap();
        assert_eq!(state.diameter, 60.0);
    }

    #[test]
    fn set_color_dispatches_stripped_text() {
        let op = Operation::resolve(&crate::parse_command("setColor('blue')")).unwrap();
        assert_eq!(op, Operation::SetColor(Some("blue".to_string())));
    }

    #[test]
    fn set_color_stringifies_non_text() {
        let op = Operation::resolve(&Instruction::new("setColor", vec![Value::Number(5.0)]));
        assert_eq!(op.unwrap(), Operation::SetColor(Some("5".to_string())));
    }

    #[test]
    fn missing_arguments_skip_the_operation() {
        let mut led = Indicator::new();
        let mut rx = led.subscribe();

        let state = execute(&mut led, &json!("setColor()")).unwrap();
        assert_eq!(state.color, "red");
        let state = execute(&mut led, &json!("setSize")).unwrap();
        assert_eq!(state.diameter, 30.0);
        let state = execute(&mut led, &json!({"method": "setColor", "params": [""]})).unwrap();
        assert_eq!(state.color, "red");

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn method_object_turns_on_regardless_of_prior_state() {
        for initial in [false, true] {
            let mut led =
                Indicator::from_attributes(&IndicatorAttributes::new().power(initial)).unwrap();
            let state = execute(&mut led, &json!({"method": "on", "params": []})).unwrap();
            assert!(state.power);
        }
    }

    #[test]
    fn get_state_does_not_mutate() {
        let mut led = Indicator::new();
        let mut rx = led.subscribe();
        let state = execute(&mut led, &json!("getState()")).unwrap();
        assert_eq!(state, led.state());
        assert!(!Operation::GetState.is_mutating());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unknown_method_leaves_state_unchanged() {
        let mut led = Indicator::new();
        let before = led.state();
        let reply = execute_reply(&mut led, &json!("explode"));
        assert_eq!(reply, CommandReply::failure("unknown method: explode"));
        assert_eq!(led.state(), before);
    }

    #[test]
    fn unrecognized_payload_is_not_dispatched() {
        let mut led = Indicator::new();
        let before = led.state();
        let err = execute(&mut led, &json!(42)).unwrap_err();
        assert_eq!(
            err,
            CommandError::Interpret(InterpretError::Unrecognized("42".to_string()))
        );
        assert_eq!(led.state(), before);
    }

    #[test]
    fn malformed_size_is_rejected() {
        let mut led = Indicator::new();
        for payload in [json!("setSize('big')"), json!("setSize(0)"), json!("setSize(true)")] {
            let reply = execute_reply(&mut led, &payload);
            assert!(!reply.success, "{payload}");
            assert!(reply.error.unwrap().starts_with("invalid diameter: "));
        }
        assert_eq!(led.diameter(), 30.0);
    }

    #[test]
    fn numeric_text_size_is_coerced() {
        let mut led = Indicator::new();
        let state = execute(&mut led, &json!({"method": "setSize", "params": ["72"]})).unwrap();
        assert_eq!(state.diameter, 72.0);
    }

    #[test]
    fn toggle_string_forms_are_equivalent() {
        let mut a = Indicator::new();
        let mut b = Indicator::new();
        execute(&mut a, &json!("toggle()")).unwrap();
        execute(&mut b, &json!("toggle")).unwrap();
        assert_eq!(a.state(), b.state());
        assert!(a.power());
    }
}
