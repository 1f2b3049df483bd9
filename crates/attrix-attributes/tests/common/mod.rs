//! Common test utilities for attrix-attributes integration tests.
//!
//! Every test builds its own in-memory store, directory and publisher so
//! tests never share state.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use attrix_attributes::definition::{NS_EXT_SOURCE_ATTR_DEF, NS_PRINCIPAL_ATTR_DEF};
use attrix_attributes::{
    AttributeDefinition, AttributeRef, BonaFideConfig, BonaFideStatusModule,
    InMemoryAttributeStore, InMemoryDefinitionRegistry, InMemoryPrincipalDirectory,
    MessageIdentityExtractor, Principal, ValueType,
};
use attrix_core::{AttributeId, PrincipalId};
use attrix_events::{EntityKind, InMemoryPublisher};
use uuid::Uuid;

/// Principal every fixture is about.
pub const PRINCIPAL_ID: u32 = 42;

/// Wire form of the fixture principal.
pub const PRINCIPAL_SEGMENT: &str =
    "Principal:[id=<42>, uuid=<7d1e2c4a-0000-4000-8000-000000000042>, displayName=<Jane Doe>]";

/// Wire form of an external identity source owned by the fixture principal.
pub const EXT_SOURCE_SEGMENT: &str =
    "ExternalIdentitySource:[id=<7>, principalId=<42>, source=<https://idp.example.org>, login=<jane@example.org>]";

/// Store definition for `source`.
pub fn definition(id: u32, source: AttributeRef, value_type: ValueType) -> AttributeDefinition {
    AttributeDefinition {
        id: AttributeId::new(id),
        display_name: source.name.clone(),
        namespace: source.namespace,
        name: source.name,
        value_type,
        description: String::new(),
    }
}

/// A module wired to in-memory collaborators with all sources defined.
pub struct TestContext {
    pub config: BonaFideConfig,
    pub store: Arc<InMemoryAttributeStore>,
    pub directory: Arc<InMemoryPrincipalDirectory>,
    pub registry: InMemoryDefinitionRegistry,
    pub publisher: InMemoryPublisher,
    pub module: BonaFideStatusModule,
    pub principal: Principal,
}

impl TestContext {
    /// Build a context with the default configuration.
    pub async fn new() -> Self {
        Self::with_config(BonaFideConfig::default()).await
    }

    /// Build a context around `config`.
    pub async fn with_config(config: BonaFideConfig) -> Self {
        let store = Arc::new(InMemoryAttributeStore::new());
        store
            .define(definition(10, config.status_ref(), ValueType::String))
            .await;
        store
            .define(definition(11, config.affiliation_ref(), ValueType::List))
            .await;
        store
            .define(definition(12, config.count_ref(), ValueType::Map))
            .await;
        store
            .define_for(
                definition(13, config.affiliation_event_ref(), ValueType::List),
                EntityKind::ExternalIdentitySource,
            )
            .await;

        let mut principal = Principal::new(PrincipalId::new(PRINCIPAL_ID), "Jane Doe");
        principal.uuid = Uuid::from_u128(0x7d1e_2c4a_0000_4000_8000_0000_0000_0042);
        let directory = Arc::new(InMemoryPrincipalDirectory::new());
        directory.insert(principal.clone()).await;

        let extractor = Arc::new(MessageIdentityExtractor::new(directory.clone()));
        let registry = InMemoryDefinitionRegistry::new();
        let module =
            BonaFideStatusModule::register(config.clone(), &registry, store.clone(), extractor)
                .await
                .expect("module registration succeeds");

        Self {
            config,
            store,
            directory,
            registry,
            publisher: InMemoryPublisher::new(),
            module,
            principal,
        }
    }

    pub async fn set_status(&self, value: &str) {
        self.store
            .set_value(self.principal.id, &self.config.status_ref(), value)
            .await;
    }

    pub async fn set_affiliations(&self, values: &[&str]) {
        let list: Vec<String> = values.iter().map(ToString::to_string).collect();
        self.store
            .set_value(self.principal.id, &self.config.affiliation_ref(), list)
            .await;
    }

    pub async fn set_counts(&self, entries: &[(&str, &str)]) {
        let map: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.store
            .set_value(self.principal.id, &self.config.count_ref(), map)
            .await;
    }

    pub async fn clear_status(&self) {
        self.store
            .unset_value(self.principal.id, &self.config.status_ref())
            .await;
    }

    /// Current derived value as a plain string, if set.
    pub async fn derived(&self) -> Option<String> {
        self.module
            .compute(&self.principal)
            .await
            .as_string()
            .map(ToString::to_string)
    }
}

/// Audit line announcing that `name` was set on the fixture principal.
pub fn set_for_principal(name: &str, value: &str) -> String {
    format!(
        "Attribute:[id=<10>, namespace=<{NS_PRINCIPAL_ATTR_DEF}>, name=<{name}>, type=<String>, value=<{value}>] set for {PRINCIPAL_SEGMENT}."
    )
}

/// Audit line announcing that `name` was removed from the fixture principal.
pub fn removed_for_principal(name: &str) -> String {
    format!(
        "AttributeDefinition:[id=<10>, namespace=<{NS_PRINCIPAL_ATTR_DEF}>, name=<{name}>, type=<String>] removed for {PRINCIPAL_SEGMENT}."
    )
}

/// Audit line announcing that `name` was set on the fixture external source.
pub fn set_for_ext_source(name: &str, value: &str) -> String {
    format!(
        "Attribute:[id=<13>, namespace=<{NS_EXT_SOURCE_ATTR_DEF}>, name=<{name}>, type=<List>, value=<{value}>] set for {EXT_SOURCE_SEGMENT}."
    )
}
