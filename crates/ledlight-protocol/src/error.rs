//! Command interpreter and dispatch errors.

use ledlight_core::WidgetError;
use thiserror::Error;

/// Result type for interpreting an inbound payload.
pub type InterpretResult<T> = Result<T, InterpretError>;

/// Result type for the full interpret + dispatch pipeline.
pub type CommandResult<T> = Result<T, CommandError>;

/// The payload could not be turned into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// Payload is neither a call string nor a recognized object shape.
    #[error("unrecognized instruction: {0}")]
    Unrecognized(String),
}

/// The argument list of a call string could not be split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A quoted argument is missing its closing quote.
    #[error("unterminated {quote} quote in argument list")]
    UnterminatedQuote { quote: char },
}

/// The instruction could not be applied to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Method name outside the dispatch table.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// The widget rejected the argument.
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

/// Any failure while handling an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Interpret(#[from] InterpretError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
