//! Widget and registry error types.

use thiserror::Error;

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Result type for element registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by the indicator widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// Diameter input is not a finite, positive number.
    #[error("invalid diameter: {input}")]
    InvalidDiameter { input: String },

    /// Attribute name is not one the widget observes.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

impl WidgetError {
    /// Creates an invalid diameter error.
    pub fn invalid_diameter(input: impl Into<String>) -> Self {
        Self::InvalidDiameter {
            input: input.into(),
        }
    }
}

/// Errors raised by the element registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Tag is not a valid custom element name.
    #[error("invalid element name: {0}")]
    InvalidName(String),

    /// Tag has already been defined on this registry.
    #[error("element already defined: {0}")]
    AlreadyDefined(String),

    /// Tag has no definition on this registry.
    #[error("element not defined: {0}")]
    Undefined(String),

    /// The element constructor rejected its attributes.
    #[error("failed to construct element: {0}")]
    Construct(#[from] WidgetError),
}
