//! Value computer for the derived attribute.
//!
//! Probes run strictly in declared order; the order is the precedence
//! policy. The first qualifying probe sets the marker and later probes are
//! not fetched at all. Unavailable or malformed sources are logged and
//! skipped.

use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::model::{Attribute, AttributeDefinition, AttributeValue, Principal};
use crate::probe::{ProbeOutcome, SourceProbe};
use crate::store::AttributeStore;

/// Ordered reduction of probe outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainVerdict {
    qualified_by: Option<usize>,
    skipped: usize,
}

impl ChainVerdict {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the outcome of the probe at `position`. Breaks once a probe
    /// qualifies; nothing absorbed afterwards changes the verdict.
    pub fn absorb(&mut self, position: usize, outcome: &ProbeOutcome) -> ControlFlow<()> {
        if self.qualified_by.is_some() {
            return ControlFlow::Break(());
        }
        match outcome {
            ProbeOutcome::Qualified => {
                self.qualified_by = Some(position);
                ControlFlow::Break(())
            }
            ProbeOutcome::NotQualified => ControlFlow::Continue(()),
            ProbeOutcome::Unavailable(_) | ProbeOutcome::Malformed(_) => {
                self.skipped += 1;
                ControlFlow::Continue(())
            }
        }
    }

    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.qualified_by.is_some()
    }

    /// Position of the probe that qualified.
    #[must_use]
    pub fn qualified_by(&self) -> Option<usize> {
        self.qualified_by
    }

    /// Number of probes skipped as unavailable or malformed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Runs the probe chain and builds the derived attribute.
pub struct ValueComputer {
    definition: AttributeDefinition,
    marker: String,
    probes: Vec<Box<dyn SourceProbe>>,
    store: Arc<dyn AttributeStore>,
}

impl ValueComputer {
    pub fn new(
        definition: AttributeDefinition,
        marker: impl Into<String>,
        probes: Vec<Box<dyn SourceProbe>>,
        store: Arc<dyn AttributeStore>,
    ) -> Self {
        Self {
            definition,
            marker: marker.into(),
            probes,
            store,
        }
    }

    #[must_use]
    pub fn definition(&self) -> &AttributeDefinition {
        &self.definition
    }

    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Evaluate the chain for `principal` and return the verdict.
    pub async fn evaluate(&self, principal: &Principal) -> ChainVerdict {
        let mut verdict = ChainVerdict::new();
        for (position, probe) in self.probes.iter().enumerate() {
            let outcome = probe.evaluate(self.store.as_ref(), principal).await;
            match &outcome {
                ProbeOutcome::Qualified | ProbeOutcome::NotQualified => debug!(
                    principal_id = %principal.id,
                    source = %probe.source(),
                    qualified = outcome.is_qualified(),
                    "Probe evaluated"
                ),
                ProbeOutcome::Unavailable(e) => warn!(
                    principal_id = %principal.id,
                    source = %probe.source(),
                    error = %e,
                    "Cannot read source attribute, skipping"
                ),
                ProbeOutcome::Malformed(e) => error!(
                    principal_id = %principal.id,
                    source = %probe.source(),
                    error = %e,
                    "Source attribute has wrong value, treating as not qualified"
                ),
            }
            if verdict.absorb(position, &outcome).is_break() {
                break;
            }
        }
        debug!(
            principal_id = %principal.id,
            qualified_by = ?verdict.qualified_by(),
            skipped = verdict.skipped(),
            "Resolution chain evaluated"
        );
        verdict
    }

    /// Derived attribute for `principal`: the marker if any probe
    /// qualifies, unset otherwise.
    pub async fn compute(&self, principal: &Principal) -> Attribute {
        if self.evaluate(principal).await.is_qualified() {
            Attribute::with_value(
                self.definition.clone(),
                AttributeValue::String(self.marker.clone()),
            )
        } else {
            Attribute::unset(self.definition.clone())
        }
    }
}
