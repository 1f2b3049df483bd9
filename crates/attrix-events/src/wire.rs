//! Audit message grammar.
//!
//! Every state change elsewhere in the system is announced as one line of
//! text built from bracketed bean serializations:
//!
//! ```text
//! Attribute:[id=<5>, namespace=<...>, name=<status>, type=<String>, value=<yes>] set for Principal:[id=<42>, ...].
//! AttributeDefinition:[id=<5>, namespace=<...>, name=<status>, type=<String>] removed for Principal:[id=<42>, ...].
//! All attributes removed for ExternalIdentitySource:[id=<7>, principalId=<42>, ...].
//! ```
//!
//! Types taking part in the grammar implement [`WireEntity`]; the free
//! functions below assemble the three message shapes.

use serde::{Deserialize, Serialize};

/// Serialized form of an unset value.
pub const NULL_VALUE: &str = "\\0";

/// Separator between a changed attribute and its owner in a "set" message.
pub const SET_FOR: &str = " set for ";

/// Separator between a removed definition and its owner in a "removed" message.
pub const REMOVED_FOR: &str = " removed for ";

/// Prefix of a bulk removal message.
pub const ALL_ATTRIBUTES_REMOVED_FOR: &str = "All attributes removed for ";

/// Owner kinds that attribute changes are reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A principal.
    Principal,
    /// An external identity source record linked to a principal.
    ExternalIdentitySource,
}

impl EntityKind {
    /// Bean name used in the serialized form.
    #[must_use]
    pub const fn bean_name(self) -> &'static str {
        match self {
            Self::Principal => "Principal",
            Self::ExternalIdentitySource => "ExternalIdentitySource",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.bean_name())
    }
}

/// A value that appears in audit messages as `Bean:[field=<value>, ...]`.
pub trait WireEntity {
    /// Bean name placed before the bracketed field list.
    const BEAN_NAME: &'static str;

    /// Ordered field list. Values must already be escaped (see [`escape`]);
    /// `None` is written as [`NULL_VALUE`].
    fn wire_fields(&self) -> Vec<(&'static str, Option<String>)>;

    /// Renders the bean in its bracketed text form.
    fn serialize_to_string(&self) -> String {
        let body = self
            .wire_fields()
            .into_iter()
            .map(|(name, value)| {
                format!("{name}=<{}>", value.as_deref().unwrap_or(NULL_VALUE))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}:[{}]", Self::BEAN_NAME, body)
    }
}

/// Escapes a scalar field value so it cannot terminate its `<...>` wrapper.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes an element of a list or map value. On top of [`escape`], the
/// element and key separators are escaped too.
#[must_use]
pub fn escape_item(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '>' | ',' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `"<attribute> set for <owner>."`
#[must_use]
pub fn set_message<A: WireEntity, O: WireEntity>(attribute: &A, owner: &O) -> String {
    format!(
        "{}{SET_FOR}{}.",
        attribute.serialize_to_string(),
        owner.serialize_to_string()
    )
}

/// `"<definition> removed for <owner>."`
#[must_use]
pub fn removed_message<D: WireEntity, O: WireEntity>(definition: &D, owner: &O) -> String {
    format!(
        "{}{REMOVED_FOR}{}.",
        definition.serialize_to_string(),
        owner.serialize_to_string()
    )
}

/// `"All attributes removed for <owner>."`
#[must_use]
pub fn all_removed_message<O: WireEntity>(owner: &O) -> String {
    format!("{ALL_ATTRIBUTES_REMOVED_FOR}{}.", owner.serialize_to_string())
}

/// A bean read back out of audit text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBean {
    /// Bean name before `:[`.
    pub name: String,
    /// Fields in order, values unescaped; `None` for [`NULL_VALUE`].
    pub fields: Vec<(String, Option<String>)>,
}

impl WireBean {
    /// Value of `field`, if present and set.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }
}

/// Every top-level bean in `message`, in order of appearance.
///
/// `<...>` values are consumed as opaque text with `\` escapes honored, so
/// bean-like text inside a value is never reported as a bean of its own.
/// Unwrapped values (`id=42`) run up to the next `,` or `]`.
#[must_use]
pub fn parse_beans(message: &str) -> Vec<WireBean> {
    let bytes = message.as_bytes();
    let mut beans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let at_word_start = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
        if !(bytes[pos].is_ascii_alphabetic() && at_word_start) {
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
            pos += 1;
        }
        if !message[pos..].starts_with(":[") {
            continue;
        }
        if let Some((fields, next)) = parse_fields(message, pos + 2) {
            beans.push(WireBean {
                name: message[start..pos].to_string(),
                fields,
            });
            pos = next;
        }
    }
    beans
}

/// Field list starting right after `:[`. Returns the fields and the
/// position after the closing `]`.
fn parse_fields(message: &str, mut pos: usize) -> Option<(Vec<(String, Option<String>)>, usize)> {
    let bytes = message.as_bytes();
    let mut fields = Vec::new();
    if bytes.get(pos) == Some(&b']') {
        return Some((fields, pos + 1));
    }

    loop {
        let name_start = pos;
        while bytes.get(pos)?.is_ascii_alphanumeric() {
            pos += 1;
        }
        if pos == name_start || bytes[pos] != b'=' {
            return None;
        }
        let name = message[name_start..pos].to_string();
        pos += 1;

        let value = if bytes.get(pos) == Some(&b'<') {
            let (value, next) = read_wrapped(message, pos + 1)?;
            pos = next;
            value
        } else {
            let value_start = pos;
            while !matches!(bytes.get(pos)?, b',' | b']') {
                pos += 1;
            }
            Some(message[value_start..pos].to_string())
        };
        fields.push((name, value));

        match bytes.get(pos)? {
            b']' => return Some((fields, pos + 1)),
            b',' => {
                pos += 1;
                if bytes.get(pos) == Some(&b' ') {
                    pos += 1;
                }
            }
            _ => return None,
        }
    }
}

/// Value starting right after `<`. Returns the unescaped value and the
/// position after the closing `>`.
fn read_wrapped(message: &str, start: usize) -> Option<(Option<String>, usize)> {
    let mut value = String::new();
    let mut chars = message[start..].char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?.1),
            '>' => {
                let end = start + offset;
                let value = (&message[start..end] != NULL_VALUE).then_some(value);
                return Some((value, end + 1));
            }
            _ => value.push(c),
        }
    }
    None
}
