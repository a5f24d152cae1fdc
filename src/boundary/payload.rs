//! Payload assembly for non-JSON bodies
//!
//! Form bodies and query strings arrive as ordered key/value pairs of
//! strings. They are folded into a JSON object so the same schema, with
//! coercion enabled where needed, validates every transport.

use serde_json::{Map, Value};

use crate::schema::{FieldType, Schema};

/// Folds key/value pairs into a JSON object shaped for `schema`.
///
/// - A key seen once maps to a string, or to a one-element array when the
///   schema declares that field as an array
/// - A repeated key maps to an array of strings in arrival order
/// - A key ending in `[]` always maps to an array, under the bare name
pub fn record_from_pairs(schema: &Schema, pairs: Vec<(String, String)>) -> Value {
    let mut record = fold_pairs(pairs);

    for field in &schema.fields {
        if !matches!(field.field_type, FieldType::Array { .. }) {
            continue;
        }
        if let Some(value) = record.get_mut(&field.name) {
            if value.is_string() {
                let single = value.take();
                *value = Value::Array(vec![single]);
            }
        }
    }

    Value::Object(record)
}

fn fold_pairs(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut record = Map::new();

    for (key, value) in pairs {
        let (name, forced_array) = match key.strip_suffix("[]") {
            Some(name) => (name.to_string(), true),
            None => (key, false),
        };

        match record.get_mut(&name) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None if forced_array => {
                record.insert(name, Value::Array(vec![Value::String(value)]));
            }
            None => {
                record.insert(name, Value::String(value));
            }
        }
    }

    record
}
