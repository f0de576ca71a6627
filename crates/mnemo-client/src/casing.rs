//! Field-name transcoding from call-site snake_case to wire camelCase.
//!
//! Transcoding is a pure function over [`serde_json::Value`] and knows
//! nothing about request shapes. Values stored under a passthrough key are
//! caller-owned payloads and keep their casing untouched at every depth.

use serde_json::{Map, Value};

/// Keys whose subtrees are forwarded verbatim. The key itself is still
/// transcoded (both are single words, so it is unchanged in practice).
pub const PASSTHROUGH_KEYS: &[&str] = &["metadata", "value"];

/// Convert a single `snake_case` name to `camelCase`.
///
/// The first segment is kept as-is; each following segment has its first
/// character upper-cased and the rest lower-cased. Empty segments (from
/// doubled or leading underscores) vanish.
pub fn to_camel_case(name: &str) -> String {
    let mut segments = name.split('_');
    let mut out = String::with_capacity(name.len());

    if let Some(first) = segments.next() {
        out.push_str(first);
    }

    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }

    out
}

/// Recursively transcode every object key in `value` to camelCase.
///
/// Objects nested in arrays are transcoded too; arrays nested directly in
/// arrays and all scalars are returned unchanged.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(camelize_map(map)),
        Value::Array(items) => Value::Array(camelize_array(items)),
        other => other,
    }
}

/// Object-level entry point used by the transport for `params`.
pub fn camelize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let camel = to_camel_case(&key);
            if PASSTHROUGH_KEYS.contains(&key.as_str()) {
                (camel, value)
            } else {
                (camel, camelize_keys(value))
            }
        })
        .collect()
}

fn camelize_array(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(camelize_map(map)),
            other => other,
        })
        .collect()
}
