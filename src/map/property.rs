//! Custom properties attached to maps, layers, tilesets and objects

use serde::{Deserialize, Deserializer};

/// Type tag of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    Color,
    File,
    Object,
    Class,
}

/// A single `<property>`
///
/// The value is always kept as written. Multi-line string values are stored
/// as element text instead of a `value` attribute; both forms end up in
/// [`Property::value`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawProperty")]
pub struct Property {
    pub name: String,
    pub value: String,
    pub kind: PropertyType,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: PropertyType::String,
        }
    }
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@type", default)]
    kind: PropertyType,
    #[serde(rename = "@value")]
    value: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

impl From<RawProperty> for Property {
    fn from(raw: RawProperty) -> Self {
        Self {
            name: raw.name,
            value: raw.value.unwrap_or(raw.text),
            kind: raw.kind,
        }
    }
}

/// Unwrap `<properties><property/>...</properties>` into a plain list
pub(crate) fn deserialize_properties<'de, D>(deserializer: D) -> Result<Vec<Property>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Properties {
        #[serde(rename = "property", default)]
        property: Vec<Property>,
    }

    Properties::deserialize(deserializer).map(|p| p.property)
}

/// Look up a property by name
pub fn find<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties.iter().find(|p| p.name == name)
}
