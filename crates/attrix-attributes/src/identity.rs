//! Principal resolution from audit messages.

use std::sync::Arc;

use async_trait::async_trait;
use attrix_core::PrincipalId;
use attrix_events::{parse_beans, EntityKind, WireBean};
use tracing::warn;

use crate::model::Principal;
use crate::store::PrincipalDirectory;

fn owner_id(beans: &[WireBean], entity: EntityKind, field: &str) -> Option<PrincipalId> {
    beans
        .iter()
        .filter(|bean| bean.name == entity.bean_name())
        .find_map(|bean| bean.field(field)?.parse().ok())
}

/// Resolves the principal an audit message is about.
#[async_trait]
pub trait IdentityExtractor: Send + Sync {
    /// `None` when the message names no principal or the principal cannot be loaded.
    async fn resolve_principal(&self, message: &str) -> Option<Principal>;
}

/// Reads the principal id out of the message and loads the principal from
/// a directory.
///
/// Only real bean segments count, never bean-like text inside a value. A
/// `Principal:[...]` bean wins; otherwise the owner of an
/// `ExternalIdentitySource:[...]` bean is used.
pub struct MessageIdentityExtractor {
    directory: Arc<dyn PrincipalDirectory>,
}

impl MessageIdentityExtractor {
    pub fn new(directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { directory }
    }

    /// Principal id referenced by the message, if any.
    #[must_use]
    pub fn principal_id(message: &str) -> Option<PrincipalId> {
        let beans = parse_beans(message);
        owner_id(&beans, EntityKind::Principal, "id")
            .or_else(|| owner_id(&beans, EntityKind::ExternalIdentitySource, "principalId"))
    }
}

#[async_trait]
impl IdentityExtractor for MessageIdentityExtractor {
    async fn resolve_principal(&self, message: &str) -> Option<Principal> {
        let id = Self::principal_id(message)?;
        match self.directory.get_principal(id).await {
            Ok(principal) => Some(principal),
            Err(e) => {
                warn!(principal_id = %id, error = %e, "Principal referenced by message could not be loaded");
                None
            }
        }
    }
}
