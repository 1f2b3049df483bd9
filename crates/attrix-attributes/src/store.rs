//! Attribute store and principal directory collaborators.
//!
//! The storage engine itself lives elsewhere; these traits are the narrow
//! request/response surface the derived attribute needs. The in-memory
//! implementations back the tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use attrix_core::PrincipalId;
use attrix_events::EntityKind;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::model::{Attribute, AttributeDefinition, AttributeRef, AttributeValue, Principal};

/// Read access to stored attribute values.
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Fetch `attribute` for `principal`. An attribute that is defined but
    /// has no value comes back unset, not as an error.
    async fn get_attribute(
        &self,
        principal: &Principal,
        attribute: &AttributeRef,
    ) -> Result<Attribute, StoreError>;
}

/// Lookup of principals by id.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    async fn get_principal(&self, id: PrincipalId) -> Result<Principal, StoreError>;
}

#[derive(Debug, Clone)]
struct StoredDefinition {
    definition: AttributeDefinition,
    entity: EntityKind,
}

/// In-memory attribute store for testing.
#[derive(Debug, Default)]
pub struct InMemoryAttributeStore {
    definitions: Arc<RwLock<HashMap<AttributeRef, StoredDefinition>>>,
    values: Arc<RwLock<HashMap<(PrincipalId, AttributeRef), AttributeValue>>>,
    failures: Arc<RwLock<HashMap<AttributeRef, StoreError>>>,
    fetches: AtomicUsize,
}

impl InMemoryAttributeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a principal attribute.
    pub async fn define(&self, definition: AttributeDefinition) {
        self.define_for(definition, EntityKind::Principal).await;
    }

    /// Define an attribute assignable to `entity` only. Reading it for a
    /// principal fails with `WrongAssignment` unless `entity` is `Principal`.
    pub async fn define_for(&self, definition: AttributeDefinition, entity: EntityKind) {
        self.definitions
            .write()
            .await
            .insert(definition.attribute_ref(), StoredDefinition { definition, entity });
    }

    /// Set a value for a principal.
    pub async fn set_value(
        &self,
        principal: PrincipalId,
        attribute: &AttributeRef,
        value: impl Into<AttributeValue>,
    ) {
        self.values
            .write()
            .await
            .insert((principal, attribute.clone()), value.into());
    }

    /// Remove a principal's value, leaving the definition in place.
    pub async fn unset_value(&self, principal: PrincipalId, attribute: &AttributeRef) {
        self.values
            .write()
            .await
            .remove(&(principal, attribute.clone()));
    }

    /// Make every read of `attribute` fail with `error` (for testing).
    pub async fn fail_with(&self, attribute: &AttributeRef, error: StoreError) {
        self.failures.write().await.insert(attribute.clone(), error);
    }

    /// Number of `get_attribute` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttributeStore for InMemoryAttributeStore {
    async fn get_attribute(
        &self,
        principal: &Principal,
        attribute: &AttributeRef,
    ) -> Result<Attribute, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failures.read().await.get(attribute) {
            return Err(error.clone());
        }

        let stored = self
            .definitions
            .read()
            .await
            .get(attribute)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                attribute: attribute.to_string(),
            })?;

        if stored.entity != EntityKind::Principal {
            return Err(StoreError::WrongAssignment {
                attribute: attribute.to_string(),
                entity: EntityKind::Principal.to_string(),
            });
        }

        let value = self
            .values
            .read()
            .await
            .get(&(principal.id, attribute.clone()))
            .cloned();

        Ok(Attribute {
            definition: stored.definition,
            value,
        })
    }
}

/// In-memory principal directory for testing.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalDirectory {
    principals: Arc<RwLock<HashMap<PrincipalId, Principal>>>,
}

impl InMemoryPrincipalDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, principal: Principal) {
        self.principals.write().await.insert(principal.id, principal);
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryPrincipalDirectory {
    async fn get_principal(&self, id: PrincipalId) -> Result<Principal, StoreError> {
        self.principals
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::PrincipalNotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueType;
    use attrix_core::AttributeId;

    fn definition(name: &str) -> AttributeDefinition {
        AttributeDefinition {
            id: AttributeId::new(1),
            namespace: "urn:test".to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            value_type: ValueType::String,
            description: String::new(),
        }
    }

    fn principal() -> Principal {
        Principal::new(PrincipalId::new(1), "Test")
    }

    #[tokio::test]
    async fn test_undefined_attribute_is_not_found() {
        let store = InMemoryAttributeStore::new();
        let err = store
            .get_attribute(&principal(), &AttributeRef::new("urn:test", "missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_defined_without_value_is_unset() {
        let store = InMemoryAttributeStore::new();
        let def = definition("status");
        store.define(def.clone()).await;

        let attr = store
            .get_attribute(&principal(), &def.attribute_ref())
            .await
            .unwrap();
        assert!(attr.value.is_none());
    }

    #[tokio::test]
    async fn test_set_and_unset_value() {
        let store = InMemoryAttributeStore::new();
        let def = definition("status");
        let p = principal();
        store.define(def.clone()).await;
        store.set_value(p.id, &def.attribute_ref(), "granted").await;

        let attr = store.get_attribute(&p, &def.attribute_ref()).await.unwrap();
        assert_eq!(attr.as_string(), Some("granted"));

        store.unset_value(p.id, &def.attribute_ref()).await;
        let attr = store.get_attribute(&p, &def.attribute_ref()).await.unwrap();
        assert!(attr.value.is_none());
    }

    #[tokio::test]
    async fn test_ext_source_attribute_is_wrong_assignment() {
        let store = InMemoryAttributeStore::new();
        let def = definition("affiliation");
        store
            .define_for(def.clone(), EntityKind::ExternalIdentitySource)
            .await;

        let err = store
            .get_attribute(&principal(), &def.attribute_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::WrongAssignment { .. }));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = InMemoryAttributeStore::new();
        let def = definition("status");
        store.define(def.clone()).await;
        store
            .fail_with(
                &def.attribute_ref(),
                StoreError::Backend {
                    message: "timeout".to_string(),
                },
            )
            .await;

        let err = store
            .get_attribute(&principal(), &def.attribute_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend { .. }));
    }

    #[tokio::test]
    async fn test_directory_lookup() {
        let directory = InMemoryPrincipalDirectory::new();
        let p = principal();
        directory.insert(p.clone()).await;

        assert_eq!(directory.get_principal(p.id).await.unwrap(), p);
        assert!(matches!(
            directory.get_principal(PrincipalId::new(99)).await,
            Err(StoreError::PrincipalNotFound { .. })
        ));
    }
}
