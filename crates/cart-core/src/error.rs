//! # Cart Error Types
//!
//! Typed error handling for the town-cart state manager.
//! All cart operations return `Result<T, CartError>`.

use thiserror::Error;

/// Core error type for all cart operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Item draft failed validation (missing name, bad price or quantity)
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Positional edit/delete outside the current cart bounds
    #[error("Index {index} out of range for cart of {len} items")]
    OutOfRange { index: usize, len: usize },

    /// Id-based edit/delete for an entry that is no longer in the cart
    #[error("Line item not found: {id}")]
    UnknownItem { id: String },

    /// Zone has no configured shipping fee (strict zone mode only)
    #[error("Unknown delivery zone: {zone}")]
    UnknownZone { zone: String },

    /// Stored cart could not be parsed or violates line item rules
    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    /// Persistent store read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors (unreadable or invalid TOML)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CartError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CartError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns true if the operation was declined because of caller input.
    /// Declined operations leave the session untouched and can simply be
    /// re-invoked with corrected input.
    pub fn is_declined(&self) -> bool {
        matches!(
            self,
            CartError::Validation { .. }
                | CartError::OutOfRange { .. }
                | CartError::UnknownItem { .. }
                | CartError::UnknownZone { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::Validation { .. } => 400,
            CartError::OutOfRange { .. } => 404,
            CartError::UnknownItem { .. } => 404,
            CartError::UnknownZone { .. } => 400,
            CartError::MalformedPersistedState(_) => 500,
            CartError::Storage(_) => 500,
            CartError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;
