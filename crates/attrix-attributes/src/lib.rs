//! Derived (virtual) principal attributes.
//!
//! This crate computes the bona fide researcher status of a principal from
//! a prioritized chain of independent source attributes and keeps it
//! consistent by reacting to audit messages about any of those sources.
//!
//! # Features
//!
//! - Ordered source probes with per-probe outcomes (qualified, not qualified,
//!   unavailable, malformed)
//! - Lazy precedence: later probes are never read once one qualifies
//! - Classification of free-text audit messages into tagged event kinds
//! - Exactly one announcement per relevant, resolvable message
//! - Static attribute descriptor registered at startup
//!
//! # Collaborators
//!
//! The [`store`] module defines the external surfaces consumed here:
//! - [`store::AttributeStore`] - source attribute lookups
//! - [`store::PrincipalDirectory`] - principal lookups by id
//! - [`identity::IdentityExtractor`] - principal resolution from message text
//! - [`registry::DefinitionRegistry`] - receives the static descriptor
//!
//! In-memory implementations of each are provided for testing.
//!
//! # Example
//!
//! ```rust,ignore
//! use attrix_attributes::{BonaFideConfig, BonaFideStatusModule};
//!
//! let module = BonaFideStatusModule::register(
//!     BonaFideConfig::from_env()?,
//!     &registry,
//!     store,
//!     extractor,
//! )
//! .await?;
//!
//! let published = module.dispatch(audit_line, &publisher).await;
//! ```

pub mod classifier;
pub mod computer;
pub mod config;
pub mod coordinator;
pub mod definition;
pub mod error;
pub mod identity;
pub mod model;
pub mod module;
pub mod probe;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use classifier::{EventClassifier, EventTag, SourceKind};
pub use computer::{ChainVerdict, ValueComputer};
pub use config::{BonaFideConfig, BonaFideConfigBuilder};
pub use coordinator::RecomputeCoordinator;
pub use definition::{bona_fide_definition, BONA_FIDE_MARKER, BONA_FIDE_STATUS_NAME};
pub use error::{AttributeError, Result, StoreError};
pub use identity::{IdentityExtractor, MessageIdentityExtractor};
pub use model::{
    Attribute, AttributeDefinition, AttributeRef, AttributeValue, ExternalIdentitySource,
    Principal, ValueType,
};
pub use module::BonaFideStatusModule;
pub use probe::{AffiliationProbe, CountProbe, ProbeOutcome, SourceProbe, StatusProbe};
pub use registry::{DefinitionRegistry, InMemoryDefinitionRegistry};
pub use store::{
    AttributeStore, InMemoryAttributeStore, InMemoryPrincipalDirectory, PrincipalDirectory,
};
