//! Static descriptor of the bona fide status attribute.

use attrix_core::AttributeId;

use crate::model::{AttributeDefinition, ValueType};

/// Namespace of stored principal attributes.
pub const NS_PRINCIPAL_ATTR_DEF: &str = "urn:attrix:principal:attribute-def:def";

/// Namespace of derived principal attributes.
pub const NS_PRINCIPAL_ATTR_VIRT: &str = "urn:attrix:principal:attribute-def:virt";

/// Namespace of stored external identity source attributes.
pub const NS_EXT_SOURCE_ATTR_DEF: &str = "urn:attrix:ext_source:attribute-def:def";

/// Name of the derived attribute.
pub const BONA_FIDE_STATUS_NAME: &str = "bonaFideStatus";

/// The only value the derived attribute can carry.
pub const BONA_FIDE_MARKER: &str = "http://www.ga4gh.org/beacon/bonafide/ver1.0";

/// Descriptor handed to the definition registry at startup.
#[must_use]
pub fn bona_fide_definition() -> AttributeDefinition {
    AttributeDefinition {
        id: AttributeId::new(0),
        namespace: NS_PRINCIPAL_ATTR_VIRT.to_string(),
        name: BONA_FIDE_STATUS_NAME.to_string(),
        display_name: "Bona fide researcher status".to_string(),
        value_type: ValueType::String,
        description: format!(
            "Flag if principal is a qualified researcher. URI '{BONA_FIDE_MARKER}' is provided \
             if the principal is a bona fide researcher. Empty value otherwise."
        ),
    }
}
