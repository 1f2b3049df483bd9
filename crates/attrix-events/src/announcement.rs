//! Announcements emitted when a derived attribute is recomputed.

use attrix_core::{PrincipalAware, PrincipalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::{removed_message, set_message, WireEntity};

/// Whether the derived attribute ended up set or unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    /// The derived attribute carries a value.
    Set,
    /// The derived attribute is empty.
    Removed,
}

impl std::fmt::Display for AnnouncementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Synthesized audit line describing the new state of a derived attribute
/// for one principal. Fed back into the event pipeline; never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundAnnouncement {
    /// Set or removed.
    pub kind: AnnouncementKind,
    /// Principal the announcement is about.
    pub principal_id: PrincipalId,
    /// Wire text, in the same grammar as inbound audit messages.
    pub text: String,
    /// When the announcement was built.
    pub emitted_at: DateTime<Utc>,
}

impl OutboundAnnouncement {
    /// `"<attribute> set for <principal>."`
    pub fn set<A, P>(attribute: &A, principal: &P) -> Self
    where
        A: WireEntity,
        P: WireEntity + PrincipalAware,
    {
        Self {
            kind: AnnouncementKind::Set,
            principal_id: principal.principal_id(),
            text: set_message(attribute, principal),
            emitted_at: Utc::now(),
        }
    }

    /// `"<definition> removed for <principal>."`
    pub fn removed<D, P>(definition: &D, principal: &P) -> Self
    where
        D: WireEntity,
        P: WireEntity + PrincipalAware,
    {
        Self {
            kind: AnnouncementKind::Removed,
            principal_id: principal.principal_id(),
            text: removed_message(definition, principal),
            emitted_at: Utc::now(),
        }
    }

    /// Wire text of the announcement.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PrincipalAware for OutboundAnnouncement {
    fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }
}

impl std::fmt::Display for OutboundAnnouncement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
