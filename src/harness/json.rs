//! Helpers for inspecting JSON response bodies.

use serde_json::Value;

/// Follows a dot-separated key path. Numeric segments index into arrays and
/// an empty path denotes the whole document.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.')
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Whether `actual` contains everything in `expected`.
///
/// Objects match when each expected key is present and matches recursively,
/// arrays when each expected element matches some actual element, scalars
/// when they are equal.
pub fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => expected.iter().all(|(key, value)| {
            actual
                .get(key)
                .is_some_and(|candidate| contains(candidate, value))
        }),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|value| actual.iter().any(|candidate| contains(candidate, value))),
        (actual, expected) => actual == expected,
    }
}

/// Text stored for a captured value: strings verbatim, anything else as JSON.
pub fn capture_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
