//! Source probes.
//!
//! A probe wraps one source attribute and a "qualifies" predicate over its
//! value. Probes never fail: fetch and predicate errors are folded into a
//! [`ProbeOutcome`] so the chain can carry on with the next probe.

use std::fmt;

use async_trait::async_trait;
use attrix_core::AttrixError;

use crate::error::StoreError;
use crate::model::{Attribute, AttributeRef, AttributeValue, Principal, ValueType};
use crate::store::AttributeStore;

/// Result of evaluating one probe for one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The source value satisfies the predicate.
    Qualified,
    /// The source was read but does not satisfy the predicate.
    NotQualified,
    /// The source could not be read for this principal.
    Unavailable(AttrixError),
    /// The source value is malformed.
    Malformed(AttrixError),
}

impl ProbeOutcome {
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        matches!(self, ProbeOutcome::Qualified)
    }
}

/// Shared capability of every probe in the resolution chain.
#[async_trait]
pub trait SourceProbe: Send + Sync + fmt::Debug {
    /// Source attribute this probe reads.
    fn source(&self) -> &AttributeRef;

    /// Read the source attribute for `principal`.
    async fn fetch(
        &self,
        store: &dyn AttributeStore,
        principal: &Principal,
    ) -> Result<Attribute, StoreError> {
        store.get_attribute(principal, self.source()).await
    }

    /// Whether the fetched attribute qualifies. `Err` means the value is
    /// malformed.
    fn qualifies(&self, attribute: &Attribute) -> Result<bool, AttrixError>;

    /// Fetch and judge in one step.
    async fn evaluate(&self, store: &dyn AttributeStore, principal: &Principal) -> ProbeOutcome {
        match self.fetch(store, principal).await {
            Err(e) => ProbeOutcome::Unavailable(AttrixError::SourceUnavailable {
                source_name: self.source().to_string(),
                reason: Some(e.to_string()),
            }),
            Ok(attribute) => match self.qualifies(&attribute) {
                Ok(true) => ProbeOutcome::Qualified,
                Ok(false) => ProbeOutcome::NotQualified,
                Err(e) => ProbeOutcome::Malformed(e),
            },
        }
    }
}

fn wrong_shape(source: &AttributeRef, expected: ValueType, found: &AttributeValue) -> AttrixError {
    AttrixError::DataFormat {
        source_name: source.to_string(),
        message: format!("expected {expected} value, found {}", found.value_type()),
    }
}

/// Qualifies when a string source is set and non-empty.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    source: AttributeRef,
}

impl StatusProbe {
    #[must_use]
    pub fn new(source: AttributeRef) -> Self {
        Self { source }
    }
}

#[async_trait]
impl SourceProbe for StatusProbe {
    fn source(&self) -> &AttributeRef {
        &self.source
    }

    fn qualifies(&self, attribute: &Attribute) -> Result<bool, AttrixError> {
        match &attribute.value {
            None => Ok(false),
            Some(AttributeValue::String(s)) => Ok(!s.is_empty()),
            Some(other) => Err(wrong_shape(&self.source, ValueType::String, other)),
        }
    }
}

/// Qualifies when any entry of a list source starts with the scope prefix.
#[derive(Debug, Clone)]
pub struct AffiliationProbe {
    source: AttributeRef,
    prefix: String,
}

impl AffiliationProbe {
    pub fn new(source: AttributeRef, prefix: impl Into<String>) -> Self {
        Self {
            source,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl SourceProbe for AffiliationProbe {
    fn source(&self) -> &AttributeRef {
        &self.source
    }

    fn qualifies(&self, attribute: &Attribute) -> Result<bool, AttrixError> {
        match &attribute.value {
            None => Ok(false),
            Some(AttributeValue::List(items)) => {
                Ok(items.iter().any(|item| item.starts_with(&self.prefix)))
            }
            Some(other) => Err(wrong_shape(&self.source, ValueType::List, other)),
        }
    }
}

/// Qualifies when a map source holds a positive integer under the key.
#[derive(Debug, Clone)]
pub struct CountProbe {
    source: AttributeRef,
    key: String,
}

impl CountProbe {
    pub fn new(source: AttributeRef, key: impl Into<String>) -> Self {
        Self {
            source,
            key: key.into(),
        }
    }
}

#[async_trait]
impl SourceProbe for CountProbe {
    fn source(&self) -> &AttributeRef {
        &self.source
    }

    fn qualifies(&self, attribute: &Attribute) -> Result<bool, AttrixError> {
        let entries = match &attribute.value {
            None => return Ok(false),
            Some(AttributeValue::Map(entries)) => entries,
            Some(other) => return Err(wrong_shape(&self.source, ValueType::Map, other)),
        };
        let Some(raw) = entries.get(&self.key) else {
            return Ok(false);
        };
        let count: i32 = raw.parse().map_err(|_| AttrixError::DataFormat {
            source_name: self.source.to_string(),
            message: format!("value '{raw}' for key {} is not an integer", self.key),
        })?;
        Ok(count > 0)
    }
}
