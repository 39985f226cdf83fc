//! Error types for scene-validator.
//!
//! Configuration errors abort setup. Everything raised while a pass is
//! running is converted into a [`ValidationResult`](crate::engine::result::ValidationResult)
//! by the runner instead of being propagated.

use thiserror::Error;

use crate::types::TypeName;

/// Errors surfaced by discovery, registration and document loading.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The same type name was declared twice in one universe.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(TypeName),

    /// A type, base type or root was named but never declared.
    #[error("unknown type '{0}'")]
    UnknownType(TypeName),

    /// Following base types from `0` leads back to `0`.
    #[error("base type chain of '{0}' is cyclic")]
    CyclicBase(TypeName),

    /// A marker or validator binding names a type outside the marker hierarchy.
    #[error("'{0}' is not a marker type")]
    NotAMarker(TypeName),

    /// Two validator types claim the same marker kind.
    #[error("marker '{marker}' is already bound to '{existing}', refusing '{duplicate}'")]
    DuplicateBinding {
        marker: TypeName,
        existing: TypeName,
        duplicate: TypeName,
    },

    /// Indexed access past the end of a type cache.
    #[error("type cache index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// No validator is registered for the marker kind.
    #[error("no validator registered for marker '{0}'")]
    NotFound(TypeName),

    /// The scene document could not be interpreted.
    #[error("invalid scene document: {0}")]
    Document(String),

    #[error("failed to parse scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ValidationError {
    /// Whether this error belongs to the setup-time configuration class.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ValidationError::DuplicateType(_)
                | ValidationError::UnknownType(_)
                | ValidationError::CyclicBase(_)
                | ValidationError::NotAMarker(_)
                | ValidationError::DuplicateBinding { .. }
                | ValidationError::IndexOutOfRange { .. }
        )
    }
}

/// An unexpected fault raised by a validator while checking one target.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleFault(pub String);

impl RuleFault {
    pub fn new(message: impl Into<String>) -> Self {
        RuleFault(message.into())
    }
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
