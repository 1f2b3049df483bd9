//! Principal-Scoped Traits
//!
//! Anything that belongs to exactly one principal (external identity
//! sources, announcements) exposes that principal's id through
//! [`PrincipalAware`].
//!
//! # Example
//!
//! ```
//! use attrix_core::{PrincipalAware, PrincipalId};
//!
//! struct Membership {
//!     principal_id: PrincipalId,
//! }
//!
//! impl PrincipalAware for Membership {
//!     fn principal_id(&self) -> PrincipalId {
//!         self.principal_id
//!     }
//! }
//!
//! let m = Membership { principal_id: PrincipalId::new(3) };
//! assert_eq!(m.principal_id().get(), 3);
//! ```

use crate::ids::PrincipalId;

/// Trait for records owned by a single principal.
///
/// Object-safe, so `&dyn PrincipalAware` works.
pub trait PrincipalAware {
    /// Returns the id of the owning principal.
    fn principal_id(&self) -> PrincipalId;
}
