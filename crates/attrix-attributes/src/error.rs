//! Error types for the attrix-attributes crate.

use attrix_core::PrincipalId;
use thiserror::Error;

/// Failures reported by the attribute store and principal directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No definition exists under this name.
    #[error("Attribute {attribute} does not exist")]
    NotFound { attribute: String },

    /// The attribute exists but cannot be assigned to this kind of entity.
    #[error("Attribute {attribute} cannot be assigned to {entity}")]
    WrongAssignment { attribute: String, entity: String },

    /// The principal is unknown to the directory.
    #[error("Principal {id} not found")]
    PrincipalNotFound { id: PrincipalId },

    /// The backend failed to answer.
    #[error("Attribute backend error: {message}")]
    Backend { message: String },
}

/// Errors raised while assembling the derived attribute module.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// Configuration value is invalid.
    #[error("Configuration invalid for {var}: {reason}")]
    ConfigInvalid { var: String, reason: String },

    /// A definition with the same namespace and name is already registered.
    #[error("Attribute definition {attribute} is already registered")]
    DuplicateDefinition { attribute: String },

    /// A classification pattern failed to compile.
    #[error("Invalid classification pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for module assembly.
pub type Result<T> = std::result::Result<T, AttributeError>;
