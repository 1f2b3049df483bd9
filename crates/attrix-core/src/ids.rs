//! Strongly Typed Identifiers
//!
//! Principals, external identity sources and attribute definitions are all
//! addressed by integer ids in audit messages (`Principal:[id=<42>, ...]`).
//! The newtypes below keep them from being mixed up at compile time.
//!
//! # Example
//!
//! ```
//! use attrix_core::{ExtSourceId, PrincipalId};
//!
//! let principal = PrincipalId::new(42);
//! let source = ExtSourceId::new(7);
//!
//! fn requires_principal(id: PrincipalId) -> String {
//!     id.to_string()
//! }
//!
//! assert_eq!(requires_principal(principal), "42");
//! // requires_principal(source); // This would not compile!
//! # let _ = source;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying integer parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed integer ID type
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw integer id.
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw integer id.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Identifier of a principal (the identity a derived attribute is computed for).
    ///
    /// # Example
    ///
    /// ```
    /// use attrix_core::PrincipalId;
    ///
    /// let id: PrincipalId = "42".parse().unwrap();
    /// assert_eq!(id.get(), 42);
    /// ```
    PrincipalId
);

define_id!(
    /// Identifier of an external identity source record linked to a principal.
    ExtSourceId
);

define_id!(
    /// Identifier assigned to an attribute definition by the definition registry.
    ///
    /// Definitions that were never registered carry id `0`.
    AttributeId
);
