//! Error types for sigaf_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by signal synthesis, augmentation and encoding.
///
/// Every stage either returns a complete, valid output or one of these
/// errors; nothing is partially applied.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A parameter is out of its domain or names an unknown variant.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The input makes a formula undefined (e.g. a constant series).
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A computation would produce NaN or an infinite value.
    #[error("Numeric error: {0}")]
    NumericError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`CoreError::InvalidParameter`].
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Reject NaN and infinite parameter values.
pub fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::invalid(name, format!("must be finite, got {value}")))
    }
}

/// Reject parameter values that are not finite and strictly positive.
pub fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CoreError::invalid(name, format!("must be > 0, got {value}")))
    }
}
