//! Typed values produced by validation
//!
//! Raw input is plain `serde_json::Value`. Once a field has passed its type
//! check and coercion it is carried as a [`TypedValue`], which adds calendar
//! dates and UTC timestamps to the JSON primitives.
//!
//! A [`TypedRecord`] keeps fields in schema declaration order and only ever
//! contains declared fields.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

/// A schema-conformant value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    /// Calendar date, serialized as `YYYY-MM-DD`
    Date(NaiveDate),
    /// UTC timestamp, serialized as RFC 3339
    DateTime(DateTime<Utc>),
    Array(Vec<TypedValue>),
    Object(TypedRecord),
}

impl TypedValue {
    /// Returns the type name used in messages and logs
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Bool(_) => "boolean",
            TypedValue::Integer(_) => "integer",
            TypedValue::Number(_) => "number",
            TypedValue::String(_) => "string",
            TypedValue::Date(_) => "date",
            TypedValue::DateTime(_) => "datetime",
            TypedValue::Array(_) => "array",
            TypedValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of integer and number values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Integer(n) => Some(*n as f64),
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            TypedValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            TypedValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&TypedRecord> {
        match self {
            TypedValue::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Converts back to plain JSON.
    ///
    /// Dates become strings in the same formats the date coercions accept,
    /// so the output validates again against the schema that produced it.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Integer(n) => Value::Number((*n).into()),
            TypedValue::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            TypedValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TypedValue::Array(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            TypedValue::Object(record) => record.to_json(),
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypedValue::Object(record) => record.serialize(serializer),
            other => other.to_json().serialize(serializer),
        }
    }
}

/// Ordered record of validated fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedRecord {
    entries: Vec<(String, TypedValue)>,
}

impl TypedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        self.entries.push((name.into(), value));
    }

    /// Looks up a field by name
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Converts the record to a JSON object
    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }

    /// Deserializes the record into a caller-defined DTO.
    pub fn into_dto<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Returns the JSON type name of a raw input value.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
