//! Error Types
//!
//! Failure taxonomy shared by the attrix crates. None of these is fatal to
//! a caller of the derived-attribute core: each one degrades either to an
//! unset derived value or to a dropped event.
//!
//! # Example
//!
//! ```
//! use attrix_core::{AttrixError, Result};
//!
//! fn read_count(raw: &str) -> Result<i32> {
//!     raw.parse().map_err(|_| AttrixError::DataFormat {
//!         source_name: "publications".to_string(),
//!         message: format!("'{raw}' is not an integer"),
//!     })
//! }
//!
//! assert!(read_count("abc").is_err());
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for attrix.
///
/// # Variants
///
/// - `SourceUnavailable` - source attribute not defined or not assignable for the principal
/// - `DataFormat` - source value present but malformed
/// - `PrincipalUnresolved` - an event matched but no principal could be derived from it
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttrixError {
    /// A source attribute could not be read for the principal.
    #[error("Source attribute {source_name} unavailable{}", reason.as_ref().map(|r| format!(": {r}")).unwrap_or_default())]
    SourceUnavailable {
        /// Fully qualified name of the source attribute
        source_name: String,
        /// Optional detail from the attribute store
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// A source attribute value did not have the expected shape.
    #[error("Malformed value in {source_name}: {message}")]
    DataFormat {
        /// Fully qualified name of the source attribute
        source_name: String,
        /// Description of the malformation
        message: String,
    },

    /// A relevant audit message did not lead to a principal.
    #[error("No principal resolvable from message: {message}")]
    PrincipalUnresolved {
        /// The raw audit message
        message: String,
    },
}

/// Type alias for Results using `AttrixError`.
pub type Result<T> = std::result::Result<T, AttrixError>;
