//! Turns inbound payloads into [`Instruction`]s.
//!
//! Accepted shapes, in priority order:
//! 1. `"name(arg1, arg2)"`: call syntax with positional arguments
//! 2. `"name"`: a bare method name
//! 3. `{"command": ...}`: the field is interpreted recursively
//! 4. `{"method": "name", "params": [...]}`: used directly
//!
//! Anything else is rejected with [`InterpretError::Unrecognized`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

use crate::error::{ArgumentError, InterpretError, InterpretResult};
use crate::types::{Instruction, Value};

/// Call syntax: method name followed by a parenthesized argument list.
static CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)\((.*)\)$").expect("Invalid call regex"));

/// Decimal numeric literal (sign, fraction and exponent optional).
static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("Invalid number regex")
});

/// Interprets a payload of any supported shape.
pub fn interpret(payload: &serde_json::Value) -> InterpretResult<Instruction> {
    match payload {
        serde_json::Value::String(command) => Ok(parse_command(command)),
        serde_json::Value::Object(fields) => {
            // Only a string or nested object under `command` is a command;
            // any other value falls through to the `method` shape.
            if let Some(command @ (serde_json::Value::String(_) | serde_json::Value::Object(_))) =
                fields.get("command")
            {
                return interpret(command);
            }
            if let Some(serde_json::Value::String(method)) = fields.get("method") {
                let params = match fields.get("params") {
                    None | Some(serde_json::Value::Null) => Vec::new(),
                    Some(serde_json::Value::Array(items)) => {
                        items.iter().map(Value::from_json).collect()
                    }
                    Some(_) => return Err(InterpretError::Unrecognized(payload.to_string())),
                };
                return Ok(Instruction::new(method.trim(), params));
            }
            Err(InterpretError::Unrecognized(payload.to_string()))
        }
        other => Err(InterpretError::Unrecognized(other.to_string())),
    }
}

/// Parses a call-syntax string such as `"setColor('blue')"`.
///
/// Strings that are not call syntax are taken as a zero-argument method
/// name, so `"toggle"` and `"toggle()"` are equivalent.
pub fn parse_command(input: &str) -> Instruction {
    let input = input.trim();
    let Some(caps) = CALL_REGEX.captures(input) else {
        return Instruction::bare(input);
    };

    let method = &caps[1];
    let content = caps[2].trim();
    let params = if content.is_empty() {
        Vec::new()
    } else {
        parse_arguments(content).unwrap_or_else(|e| {
            warn!(error = %e, arguments = content, "argument parsing failed, using raw string");
            vec![Value::Text(content.to_string())]
        })
    };

    trace!(method, ?params, "parsed call syntax");
    Instruction::new(method, params)
}

/// Splits an argument list on commas outside quotes and classifies each
/// token.
///
/// # Errors
///
/// Fails when a quoted argument is not terminated.
pub fn parse_arguments(content: &str) -> Result<Vec<Value>, ArgumentError> {
    split_arguments(content).map(|tokens| tokens.iter().map(|t| classify(t)).collect())
}

fn split_arguments(content: &str) -> Result<Vec<String>, ArgumentError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in content.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == ',' => tokens.push(std::mem::take(&mut current)),
            None => {
                // Quotes only group commas when they open an argument.
                if matches!(c, '\'' | '"') && current.trim().is_empty() {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }

    if let Some(quote) = quote {
        return Err(ArgumentError::UnterminatedQuote { quote });
    }
    tokens.push(current);
    Ok(tokens)
}

fn classify(token: &str) -> Value {
    let token = token.trim();
    if is_quoted(token) {
        return Value::Text(token[1..token.len() - 1].to_string());
    }
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if NUMBER_REGEX.is_match(token)
        && let Ok(n) = token.parse::<f64>()
    {
        return Value::Number(n);
    }
    Value::Text(token.to_string())
}

fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('"') && token.ends_with('"'))
            || (token.starts_with('\'') && token.ends_with('\'')))
}
