//! Instruction shapes, command interpreter and dispatch table for the LED
//! indicator.
//!
//! An inbound payload is first interpreted into an [`Instruction`]
//! (method name + positional [`Value`]s), then resolved against the closed
//! [`Operation`] table and applied to an [`Indicator`](ledlight_core::Indicator).
//!
//! # Example
//!
//! ```rust
//! use ledlight_core::Indicator;
//! use ledlight_protocol::{execute_reply, parse_command, Value};
//!
//! let instruction = parse_command("setColor('blue')");
//! assert_eq!(instruction.params, vec![Value::Text("blue".into())]);
//!
//! let mut led = Indicator::new();
//! let reply = execute_reply(&mut led, &serde_json::json!("on()"));
//! assert!(reply.success);
//! assert!(led.power());
//! ```

mod dispatch;
mod error;
mod interpreter;
mod types;

pub use dispatch::{METHODS, Operation, execute, execute_reply};
pub use error::{
    ArgumentError, CommandError, CommandResult, DispatchError, InterpretError, InterpretResult,
};
pub use interpreter::{interpret, parse_arguments, parse_command};
pub use types::{CommandReply, Instruction, Value};
