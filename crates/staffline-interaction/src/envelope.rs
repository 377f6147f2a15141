//! Response body shapes used by the ATS API.
//!
//! The API returns bare JSON bodies. Lists come wrapped in an object that
//! names the array (`{"candidates": [...], "total": 3}`), create endpoints
//! wrap the new record under its singular name, and errors carry a
//! `detail` field.

use serde_json::Value;
use staffline_core::overlay::Record;
use staffline_core::{Result, StafflineError};

/// Pulls the named array out of a list envelope.
///
/// A bare array is accepted too. Non-object items are dropped.
pub fn extract_list(body: Value, key: &str) -> Result<Vec<Record>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(shape_error(key)),
        },
        _ => return Err(shape_error(key)),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}

/// Returns the created record, unwrapping `{"<singular>": {...}}` when present.
pub fn unwrap_created(body: Value, singular: &str) -> Result<Record> {
    match body {
        Value::Object(mut map) => match map.remove(singular) {
            Some(Value::Object(record)) => Ok(record),
            Some(other) => {
                map.insert(singular.to_string(), other);
                Ok(map)
            }
            None => Ok(map),
        },
        _ => Err(StafflineError::Serialization {
            format: "JSON".to_string(),
            message: format!("expected a {} object in the response", singular),
        }),
    }
}

/// Pulls a named array of strings out of an envelope (`{"specialties": [...]}`).
pub fn extract_strings(body: Value, key: &str) -> Result<Vec<String>> {
    let Value::Object(mut map) = body else {
        return Err(shape_error(key));
    };
    match map.remove(key) {
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(shape_error(key)),
    }
}

/// Human-readable message from an error body.
///
/// Uses `detail` when it is a string; FastAPI validation errors arrive as a
/// list of `{msg}` objects and are joined. Anything else yields `fallback`.
pub fn error_detail(body: &str, fallback: &str) -> String {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return fallback.to_string();
    };

    match map.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => fallback.to_string(),
    }
}

fn shape_error(key: &str) -> StafflineError {
    StafflineError::Serialization {
        format: "JSON".to_string(),
        message: format!("expected `{}` array in the response", key),
    }
}
