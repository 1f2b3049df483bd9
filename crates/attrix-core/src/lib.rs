//! attrix Core Library
//!
//! Shared types and traits for attrix.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`PrincipalId`, `ExtSourceId`, `AttributeId`)
//! - [`traits`] - Principal-scoped traits (`PrincipalAware`)
//! - [`error`] - Shared failure taxonomy (`AttrixError`)
//!
//! # Example
//!
//! ```
//! use attrix_core::{AttrixError, PrincipalId, Result};
//!
//! fn example(id: PrincipalId) -> Result<()> {
//!     Err(AttrixError::PrincipalUnresolved {
//!         message: format!("no principal {id}"),
//!     })
//! }
//!
//! assert!(example(PrincipalId::new(1)).is_err());
//! ```

pub mod error;
pub mod ids;
pub mod traits;

// Re-export main types for convenient access
pub use error::{AttrixError, Result};
pub use ids::{AttributeId, ExtSourceId, ParseIdError, PrincipalId};
pub use traits::PrincipalAware;
