//! Opaque API records.

use super::kind::EntityKind;
use serde_json::{Map, Value};

/// A record as returned by the API. The client only reads the fields it needs.
pub type Record = Map<String, Value>;

/// A partial record: field name to new value.
pub type Patch = Map<String, Value>;

/// Returns the record's id as a string key.
///
/// Looks at `id` first, then the kind-specific field (`candidate_id`).
/// Numeric ids are rendered in decimal so `7` and `"7"` address the same entry.
pub fn record_id(kind: EntityKind, record: &Record) -> Option<String> {
    record
        .get("id")
        .and_then(id_to_key)
        .or_else(|| record.get(&kind.id_field()).and_then(id_to_key))
}

/// Converts a JSON id value into its string key form.
pub fn id_to_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Shallow merge: every field of `patch` overwrites the same field of `base`.
pub fn merge_into(base: &mut Record, patch: &Patch) {
    for (field, value) in patch {
        base.insert(field.clone(), value.clone());
    }
}

/// Reads a string field, treating `null` and non-strings as absent.
pub fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}
