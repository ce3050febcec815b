//! Record Module
//!
//! A product record is an open JSON object. Only `id`, `name` and
//! `description` carry meaning; every other field is opaque payload kept
//! verbatim (in its stored order).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that must be present and truthy on creation
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "name", "description"];

/// Ordered sequence of records, the unit of persistence
pub type Collection = Vec<Record>;

/// One product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Build a record from a JSON value, if it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Get a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The record's id in string form, if it has one.
    ///
    /// Follows JavaScript's `String(id)`: integral floats print as integers,
    /// arrays join their elements with commas. Null and a missing id have
    /// no string form.
    pub fn id_string(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::Null => None,
            id => Some(js_string(id)),
        }
    }

    /// Whether this record is addressed by the given path id
    pub fn matches_id(&self, id: &str) -> bool {
        self.id_string().as_deref() == Some(id)
    }

    /// Whether every required field is present and truthy
    pub fn has_required_fields(&self) -> bool {
        REQUIRED_FIELDS
            .iter()
            .all(|field| self.0.get(*field).is_some_and(is_truthy))
    }

    /// Shallow-merge `patch` onto this record.
    ///
    /// Incoming fields overwrite same-named fields; untouched fields stay.
    /// An incoming `id` is ignored so a record keeps its identity.
    pub fn merge(&mut self, patch: Record) {
        for (field, value) in patch.0 {
            if field == "id" {
                continue;
            }
            self.0.insert(field, value);
        }
    }
}

/// JavaScript string conversion of a JSON value
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // i64/u64 already print without a fraction
            Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        // Array elements that are null become empty strings
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                item => js_string(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JSON truthiness: null, false, 0, NaN and "" are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Index of the first record addressed by `id`
pub fn position(collection: &[Record], id: &str) -> Option<usize> {
    collection.iter().position(|record| record.matches_id(id))
}
