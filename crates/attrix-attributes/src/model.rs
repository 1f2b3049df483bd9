//! Attribute and identity model.
//!
//! All types here render into the audit wire grammar through
//! [`WireEntity`], so the same values that flow through the store can be
//! reported back as announcements.

use std::collections::BTreeMap;
use std::fmt;

use attrix_core::{AttributeId, ExtSourceId, PrincipalAware, PrincipalId};
use attrix_events::wire::{escape, escape_item};
use attrix_events::WireEntity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shape of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Single string.
    String,
    /// Ordered list of strings.
    List,
    /// Mapping from string keys to string values.
    Map,
}

impl ValueType {
    /// Name written into the `type=<...>` field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::List => "List",
            ValueType::Map => "Map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl AttributeValue {
    /// Shape of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::String(_) => ValueType::String,
            AttributeValue::List(_) => ValueType::List,
            AttributeValue::Map(_) => ValueType::Map,
        }
    }

    /// Escaped text placed inside `value=<...>`.
    ///
    /// Lists render as `[a,b,]`, maps as `{k:v,}`.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            AttributeValue::String(s) => escape(s),
            AttributeValue::List(items) => {
                let mut out = String::from("[");
                for item in items {
                    out.push_str(&escape_item(item));
                    out.push(',');
                }
                out.push(']');
                out
            }
            AttributeValue::Map(entries) => {
                let mut out = String::from("{");
                for (key, value) in entries {
                    out.push_str(&escape_item(key));
                    out.push(':');
                    out.push_str(&escape_item(value));
                    out.push(',');
                }
                out.push('}');
                out
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        AttributeValue::List(value)
    }
}

impl From<BTreeMap<String, String>> for AttributeValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        AttributeValue::Map(value)
    }
}

/// Fully qualified attribute name, `namespace:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeRef {
    pub namespace: String,
    pub name: String,
}

impl AttributeRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Immutable descriptor of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Registry id; `0` until registered.
    pub id: AttributeId,
    pub namespace: String,
    pub name: String,
    pub display_name: String,
    pub value_type: ValueType,
    pub description: String,
}

impl AttributeDefinition {
    /// Reference used to look this attribute up in the store.
    #[must_use]
    pub fn attribute_ref(&self) -> AttributeRef {
        AttributeRef::new(&self.namespace, &self.name)
    }
}

impl WireEntity for AttributeDefinition {
    const BEAN_NAME: &'static str = "AttributeDefinition";

    fn wire_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", Some(self.id.to_string())),
            ("namespace", Some(escape(&self.namespace))),
            ("name", Some(escape(&self.name))),
            ("type", Some(self.value_type.to_string())),
        ]
    }
}

/// An attribute definition together with its (possibly unset) value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub definition: AttributeDefinition,
    pub value: Option<AttributeValue>,
}

impl Attribute {
    /// Attribute with no value.
    #[must_use]
    pub fn unset(definition: AttributeDefinition) -> Self {
        Self {
            definition,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(definition: AttributeDefinition, value: AttributeValue) -> Self {
        Self {
            definition,
            value: Some(value),
        }
    }

    /// `true` when the value is unset or empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.value {
            None => true,
            Some(AttributeValue::String(s)) => s.is_empty(),
            Some(AttributeValue::List(items)) => items.is_empty(),
            Some(AttributeValue::Map(entries)) => entries.is_empty(),
        }
    }

    /// The value as a string, if it is one.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match &self.value {
            Some(AttributeValue::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl WireEntity for Attribute {
    const BEAN_NAME: &'static str = "Attribute";

    fn wire_fields(&self) -> Vec<(&'static str, Option<String>)> {
        let mut fields = self.definition.wire_fields();
        fields.push(("value", self.value.as_ref().map(AttributeValue::to_wire)));
        fields
    }
}

/// The identity a derived attribute is computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub uuid: Uuid,
    pub display_name: Option<String>,
}

impl Principal {
    /// Principal with a fresh random UUID.
    pub fn new(id: PrincipalId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            display_name: Some(display_name.into()),
        }
    }
}

impl PrincipalAware for Principal {
    fn principal_id(&self) -> PrincipalId {
        self.id
    }
}

impl WireEntity for Principal {
    const BEAN_NAME: &'static str = "Principal";

    fn wire_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", Some(self.id.to_string())),
            ("uuid", Some(self.uuid.to_string())),
            ("displayName", self.display_name.as_deref().map(escape)),
        ]
    }
}

/// A principal's account at an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentitySource {
    pub id: ExtSourceId,
    pub principal_id: PrincipalId,
    pub source: String,
    pub login: String,
}

impl PrincipalAware for ExternalIdentitySource {
    fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }
}

impl WireEntity for ExternalIdentitySource {
    const BEAN_NAME: &'static str = "ExternalIdentitySource";

    fn wire_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", Some(self.id.to_string())),
            ("principalId", Some(self.principal_id.to_string())),
            ("source", Some(escape(&self.source))),
            ("login", Some(escape(&self.login))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, value_type: ValueType) -> AttributeDefinition {
        AttributeDefinition {
            id: AttributeId::new(5),
            namespace: "urn:attrix:principal:attribute-def:def".to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            value_type,
            description: String::new(),
        }
    }

    mod value_tests {
        use super::*;

        #[test]
        fn test_list_wire_form() {
            let value = AttributeValue::List(vec!["a,b".to_string(), "c".to_string()]);
            assert_eq!(value.to_wire(), r"[a\,b,c,]");
        }

        #[test]
        fn test_map_wire_form_is_key_ordered() {
            let mut entries = BTreeMap::new();
            entries.insert("ELIXIR".to_string(), "3".to_string());
            entries.insert("CESNET".to_string(), "1".to_string());
            assert_eq!(
                AttributeValue::Map(entries).to_wire(),
                "{CESNET:1,ELIXIR:3,}"
            );
        }

        #[test]
        fn test_value_type() {
            assert_eq!(AttributeValue::from("x").value_type(), ValueType::String);
            assert_eq!(
                AttributeValue::from(Vec::<String>::new()).value_type(),
                ValueType::List
            );
        }

        #[test]
        fn test_untagged_json() {
            let value: AttributeValue = serde_json::from_str(r#"{"ELIXIR":"3"}"#).unwrap();
            assert!(matches!(value, AttributeValue::Map(ref m) if m["ELIXIR"] == "3"));
        }
    }

    mod attribute_ref_tests {
        use super::*;

        #[test]
        fn test_display_is_namespace_qualified() {
            let r = AttributeRef::new("urn:attrix:principal:attribute-def:def", "status");
            assert_eq!(r.to_string(), "urn:attrix:principal:attribute-def:def:status");
        }
    }

    mod wire_tests {
        use super::*;

        #[test]
        fn test_attribute_serialization() {
            let attr = Attribute::with_value(definition("status", ValueType::String), "ok".into());
            assert_eq!(
                attr.serialize_to_string(),
                "Attribute:[id=<5>, namespace=<urn:attrix:principal:attribute-def:def>, name=<status>, type=<String>, value=<ok>]"
            );
        }

        #[test]
        fn test_unset_attribute_serialization() {
            let attr = Attribute::unset(definition("status", ValueType::String));
            assert!(attr.serialize_to_string().ends_with("value=<\\0>]"));
            assert!(attr.is_empty());
        }

        #[test]
        fn test_definition_serialization_has_no_value() {
            let def = definition("publications", ValueType::Map);
            let text = def.serialize_to_string();
            assert!(text.starts_with("AttributeDefinition:[id=<5>"));
            assert!(text.contains("name=<publications>, type=<Map>"));
            assert!(!text.contains("value="));
        }

        #[test]
        fn test_principal_serialization() {
            let principal = Principal {
                id: PrincipalId::new(42),
                uuid: Uuid::nil(),
                display_name: Some("Jane Doe".to_string()),
            };
            assert_eq!(
                principal.serialize_to_string(),
                "Principal:[id=<42>, uuid=<00000000-0000-0000-0000-000000000000>, displayName=<Jane Doe>]"
            );
        }

        #[test]
        fn test_ext_source_serialization() {
            let ues = ExternalIdentitySource {
                id: ExtSourceId::new(7),
                principal_id: PrincipalId::new(42),
                source: "https://idp.example.org".to_string(),
                login: "jane".to_string(),
            };
            assert_eq!(
                ues.serialize_to_string(),
                "ExternalIdentitySource:[id=<7>, principalId=<42>, source=<https://idp.example.org>, login=<jane>]"
            );
            assert_eq!(ues.principal_id(), PrincipalId::new(42));
        }
    }
}
