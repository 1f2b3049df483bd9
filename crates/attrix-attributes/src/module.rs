//! The bona fide status module.
//!
//! Wires the static definition, the three-probe resolution chain and the
//! event classifier into one unit:
//!
//! 1. status source set and non-empty
//! 2. any scoped affiliation starting with the configured prefix
//! 3. positive count under the configured key
//!
//! The first probe that qualifies sets the marker.

use std::collections::BTreeSet;
use std::sync::Arc;

use attrix_events::{AnnouncementPublisher, OutboundAnnouncement};
use tracing::info;

use crate::classifier::{EventClassifier, EventTag};
use crate::computer::ValueComputer;
use crate::config::BonaFideConfig;
use crate::coordinator::RecomputeCoordinator;
use crate::definition::{bona_fide_definition, BONA_FIDE_MARKER};
use crate::error::Result;
use crate::identity::IdentityExtractor;
use crate::model::{Attribute, AttributeDefinition, Principal};
use crate::probe::{AffiliationProbe, CountProbe, SourceProbe, StatusProbe};
use crate::registry::DefinitionRegistry;
use crate::store::AttributeStore;

/// Derived attribute flagging bona fide researchers.
pub struct BonaFideStatusModule {
    config: BonaFideConfig,
    coordinator: RecomputeCoordinator,
}

impl BonaFideStatusModule {
    /// Build the module around the unregistered static definition.
    pub fn new(
        config: BonaFideConfig,
        store: Arc<dyn AttributeStore>,
        extractor: Arc<dyn IdentityExtractor>,
    ) -> Result<Self> {
        Self::with_definition(config, bona_fide_definition(), store, extractor)
    }

    /// Register the static definition and build the module around the
    /// registered one.
    pub async fn register(
        config: BonaFideConfig,
        registry: &dyn DefinitionRegistry,
        store: Arc<dyn AttributeStore>,
        extractor: Arc<dyn IdentityExtractor>,
    ) -> Result<Self> {
        let definition = registry.register(bona_fide_definition()).await?;
        info!(attribute = %definition.attribute_ref(), "Bona fide status module registered");
        Self::with_definition(config, definition, store, extractor)
    }

    fn with_definition(
        config: BonaFideConfig,
        definition: AttributeDefinition,
        store: Arc<dyn AttributeStore>,
        extractor: Arc<dyn IdentityExtractor>,
    ) -> Result<Self> {
        let probes: Vec<Box<dyn SourceProbe>> = vec![
            Box::new(StatusProbe::new(config.status_ref())),
            Box::new(AffiliationProbe::new(
                config.affiliation_ref(),
                config.affiliation_prefix.clone(),
            )),
            Box::new(CountProbe::new(config.count_ref(), config.count_key.clone())),
        ];
        let computer = ValueComputer::new(definition, BONA_FIDE_MARKER, probes, store);
        let classifier = EventClassifier::new(&config)?;

        Ok(Self {
            config,
            coordinator: RecomputeCoordinator::new(classifier, extractor, computer),
        })
    }

    #[must_use]
    pub fn config(&self) -> &BonaFideConfig {
        &self.config
    }

    /// Definition the derived values are built from.
    #[must_use]
    pub fn definition(&self) -> &AttributeDefinition {
        self.coordinator.computer().definition()
    }

    /// Current derived value for `principal`.
    pub async fn compute(&self, principal: &Principal) -> Attribute {
        self.coordinator.computer().compute(principal).await
    }

    #[must_use]
    pub fn classify(&self, message: &str) -> BTreeSet<EventTag> {
        self.coordinator.classifier().classify(message)
    }

    pub async fn on_event(&self, message: &str) -> Vec<OutboundAnnouncement> {
        self.coordinator.on_event(message).await
    }

    pub async fn dispatch(&self, message: &str, publisher: &dyn AnnouncementPublisher) -> usize {
        self.coordinator.dispatch(message, publisher).await
    }
}
