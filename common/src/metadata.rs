use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const IMAGE: &str = "image";
pub const ATTRIBUTES: &str = "attributes";

const UNKNOWN_TRAIT_TYPE: &str = "Unknown";
const MISSING_TRAIT_VALUE: &str = "N/A";

/// A token metadata document: any JSON object, keys kept in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

/// One entry of the `attributes` list, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trait {
    pub trait_type: String,
    pub value: String,
}

impl Metadata {
    /// Wrap a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `attributes` list, if present and actually a list.
    pub fn traits(&self) -> Option<Vec<Trait>> {
        let entries = self.0.get(ATTRIBUTES)?.as_array()?;
        Some(entries.iter().map(Trait::from_entry).collect())
    }

    /// Top-level fields not covered by the well-known keys, in document order.
    /// A non-list `attributes` value is reported here as well.
    pub fn extra_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(key, value)| match key.as_str() {
            NAME | DESCRIPTION | IMAGE => false,
            ATTRIBUTES => !value.is_array(),
            _ => true,
        })
    }
}

impl Trait {
    fn from_entry(entry: &Value) -> Self {
        match entry {
            Value::Object(fields) => Self {
                trait_type: fields
                    .get("trait_type")
                    .map(display_value)
                    .unwrap_or_else(|| UNKNOWN_TRAIT_TYPE.to_string()),
                value: fields
                    .get("value")
                    .map(display_value)
                    .unwrap_or_else(|| MISSING_TRAIT_VALUE.to_string()),
            },
            other => Self {
                trait_type: UNKNOWN_TRAIT_TYPE.to_string(),
                value: display_value(other),
            },
        }
    }
}

/// Strings as-is, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
