//! Recompute coordinator.
//!
//! Turns one relevant audit message into at most one announcement of the
//! derived attribute's current state. Irrelevant messages are rejected
//! before any store access.

use std::sync::Arc;

use attrix_core::AttrixError;
use attrix_events::{AnnouncementPublisher, OutboundAnnouncement};
use tracing::{debug, error, info, instrument, warn};

use crate::classifier::EventClassifier;
use crate::computer::ValueComputer;
use crate::identity::IdentityExtractor;

/// Reacts to audit messages about any source of the derived attribute.
pub struct RecomputeCoordinator {
    classifier: EventClassifier,
    extractor: Arc<dyn IdentityExtractor>,
    computer: ValueComputer,
}

impl RecomputeCoordinator {
    pub fn new(
        classifier: EventClassifier,
        extractor: Arc<dyn IdentityExtractor>,
        computer: ValueComputer,
    ) -> Self {
        Self {
            classifier,
            extractor,
            computer,
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn computer(&self) -> &ValueComputer {
        &self.computer
    }

    /// Announcements resulting from `message`: empty for irrelevant or
    /// unresolvable messages, otherwise exactly one regardless of how many
    /// shapes matched.
    #[instrument(skip(self, message))]
    pub async fn on_event(&self, message: &str) -> Vec<OutboundAnnouncement> {
        let tags = self.classifier.classify(message);
        if tags.is_empty() {
            return Vec::new();
        }
        debug!(tags = ?tags, "Relevant audit message");

        let Some(principal) = self.extractor.resolve_principal(message).await else {
            let e = AttrixError::PrincipalUnresolved {
                message: message.to_string(),
            };
            error!(error = %e, "Failed to get principal from message");
            return Vec::new();
        };

        let attribute = self.computer.compute(&principal).await;
        let announcement = if attribute.is_empty() {
            OutboundAnnouncement::removed(&attribute.definition, &principal)
        } else {
            OutboundAnnouncement::set(&attribute, &principal)
        };

        info!(
            principal_id = %principal.id,
            attribute = %attribute.name(),
            kind = %announcement.kind,
            "Derived attribute recomputed"
        );
        vec![announcement]
    }

    /// Run [`on_event`](Self::on_event) and hand each announcement to
    /// `publisher`. Publish failures are logged, not propagated. Returns the
    /// number of announcements accepted by the publisher.
    #[instrument(skip(self, message, publisher))]
    pub async fn dispatch(&self, message: &str, publisher: &dyn AnnouncementPublisher) -> usize {
        let mut published = 0;
        for announcement in self.on_event(message).await {
            match publisher.publish(&announcement).await {
                Ok(()) => published += 1,
                Err(e) => warn!(
                    principal_id = %announcement.principal_id,
                    error = %e,
                    transient = e.is_transient(),
                    "Failed to publish announcement"
                ),
            }
        }
        published
    }
}
