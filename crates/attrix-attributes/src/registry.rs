//! Definition registry.
//!
//! Derived attribute modules hand their static descriptor to the registry
//! once at startup and keep the id-bearing definition it returns.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use attrix_core::AttributeId;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AttributeError, Result};
use crate::model::{AttributeDefinition, AttributeRef};

/// Registry of attribute definitions.
#[async_trait]
pub trait DefinitionRegistry: Send + Sync {
    /// Register a definition and return it with its assigned id.
    async fn register(&self, definition: AttributeDefinition) -> Result<AttributeDefinition>;

    /// Look up a registered definition.
    async fn get(&self, attribute: &AttributeRef) -> Option<AttributeDefinition>;
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u32,
    definitions: HashMap<AttributeRef, AttributeDefinition>,
}

/// In-memory registry assigning sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryDefinitionRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl InMemoryDefinitionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered definitions.
    pub async fn count(&self) -> usize {
        self.state.read().await.definitions.len()
    }
}

#[async_trait]
impl DefinitionRegistry for InMemoryDefinitionRegistry {
    async fn register(&self, mut definition: AttributeDefinition) -> Result<AttributeDefinition> {
        let key = definition.attribute_ref();
        let mut state = self.state.write().await;
        if state.definitions.contains_key(&key) {
            return Err(AttributeError::DuplicateDefinition {
                attribute: key.to_string(),
            });
        }

        state.next_id += 1;
        definition.id = AttributeId::new(state.next_id);
        state.definitions.insert(key, definition.clone());

        info!(attribute = %definition.attribute_ref(), id = %definition.id, "Attribute definition registered");
        Ok(definition)
    }

    async fn get(&self, attribute: &AttributeRef) -> Option<AttributeDefinition> {
        self.state.read().await.definitions.get(attribute).cloned()
    }
}
