//! Classification of raw audit messages.
//!
//! Exactly eight message shapes are relevant to the bona fide status:
//!
//! | Shape | Owner | Source |
//! |-------|-------|--------|
//! | set / removed | Principal | status |
//! | set / removed | Principal | count |
//! | all removed | Principal | - |
//! | all removed | ExternalIdentitySource | - |
//! | set / removed | ExternalIdentitySource | affiliation |
//!
//! Each shape is matched independently, so one line may carry several tags.
//! Anything else classifies as the empty set.

use std::collections::BTreeSet;
use std::fmt;

use attrix_events::wire::{ALL_ATTRIBUTES_REMOVED_FOR, REMOVED_FOR, SET_FOR};
use attrix_events::EntityKind;
use regex::Regex;

use crate::config::BonaFideConfig;
use crate::error::Result;
use crate::model::AttributeRef;

/// Which source attribute an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Status,
    Affiliation,
    Count,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Status => write!(f, "status"),
            SourceKind::Affiliation => write!(f, "affiliation"),
            SourceKind::Count => write!(f, "count"),
        }
    }
}

/// A relevant kind of audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventTag {
    SourceValueSet {
        entity: EntityKind,
        source: SourceKind,
    },
    SourceValueRemoved {
        entity: EntityKind,
        source: SourceKind,
    },
    AllAttributesRemoved {
        entity: EntityKind,
    },
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTag::SourceValueSet { entity, source } => write!(f, "{source} set for {entity}"),
            EventTag::SourceValueRemoved { entity, source } => {
                write!(f, "{source} removed for {entity}")
            }
            EventTag::AllAttributesRemoved { entity } => {
                write!(f, "all attributes removed for {entity}")
            }
        }
    }
}

fn set_pattern(source: &AttributeRef, entity: EntityKind) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"Attribute:\[(?:.*, )?name=<{}>.*\]{}{}:\[.*\]",
        regex::escape(&source.name),
        regex::escape(SET_FOR),
        entity.bean_name(),
    ))?)
}

fn removed_pattern(source: &AttributeRef, entity: EntityKind) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"AttributeDefinition:\[(?:.*, )?name=<{}>.*\]{}{}:\[.*\]",
        regex::escape(&source.name),
        regex::escape(REMOVED_FOR),
        entity.bean_name(),
    ))?)
}

fn all_removed_pattern(entity: EntityKind) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"{}{}:\[.*\]",
        regex::escape(ALL_ATTRIBUTES_REMOVED_FOR),
        entity.bean_name(),
    ))?)
}

/// Maps audit text to the set of relevant event tags.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    rules: Vec<(EventTag, Regex)>,
}

impl EventClassifier {
    /// Compile the eight rules for the configured source names.
    pub fn new(config: &BonaFideConfig) -> Result<Self> {
        use EntityKind::{ExternalIdentitySource, Principal};

        let status = config.status_ref();
        let count = config.count_ref();
        let affiliation = config.affiliation_event_ref();

        let rules = vec![
            (
                EventTag::SourceValueSet {
                    entity: Principal,
                    source: SourceKind::Status,
                },
                set_pattern(&status, Principal)?,
            ),
            (
                EventTag::SourceValueRemoved {
                    entity: Principal,
                    source: SourceKind::Status,
                },
                removed_pattern(&status, Principal)?,
            ),
            (
                EventTag::SourceValueSet {
                    entity: Principal,
                    source: SourceKind::Count,
                },
                set_pattern(&count, Principal)?,
            ),
            (
                EventTag::SourceValueRemoved {
                    entity: Principal,
                    source: SourceKind::Count,
                },
                removed_pattern(&count, Principal)?,
            ),
            (
                EventTag::AllAttributesRemoved { entity: Principal },
                all_removed_pattern(Principal)?,
            ),
            (
                EventTag::AllAttributesRemoved {
                    entity: ExternalIdentitySource,
                },
                all_removed_pattern(ExternalIdentitySource)?,
            ),
            (
                EventTag::SourceValueSet {
                    entity: ExternalIdentitySource,
                    source: SourceKind::Affiliation,
                },
                set_pattern(&affiliation, ExternalIdentitySource)?,
            ),
            (
                EventTag::SourceValueRemoved {
                    entity: ExternalIdentitySource,
                    source: SourceKind::Affiliation,
                },
                removed_pattern(&affiliation, ExternalIdentitySource)?,
            ),
        ];

        Ok(Self { rules })
    }

    /// All tags whose shape occurs in `message`.
    #[must_use]
    pub fn classify(&self, message: &str) -> BTreeSet<EventTag> {
        self.rules
            .iter()
            .filter(|(_, pattern)| pattern.is_match(message))
            .map(|(tag, _)| *tag)
            .collect()
    }
}
