use super::error::HarnessError;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const PLACEHOLDER_OPEN: &str = "$S{";
const PLACEHOLDER_CLOSE: char = '}';

/// Values stored from earlier responses, scoped to one pipeline run.
#[derive(Debug, Default, Clone)]
pub struct ScenarioContext {
    values: BTreeMap<String, String>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        tracing::debug!(key = %key, "Storing captured value");
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Replaces every `$S{key}` in `template` with its stored value.
    pub fn resolve(&self, template: &str) -> Result<String, HarnessError> {
        let mut resolved = String::with_capacity(template.len());
        for segment in segments(template) {
            match segment {
                Segment::Literal(text) => resolved.push_str(text),
                Segment::Placeholder(key) => {
                    let value = self.get(key).ok_or_else(|| HarnessError::MissingCapture {
                        key: key.to_string(),
                    })?;
                    resolved.push_str(value);
                }
            }
        }
        Ok(resolved)
    }

    /// Resolves placeholders in every string of a JSON document. Keys are left alone.
    pub fn resolve_json(&self, value: &Value) -> Result<Value, HarnessError> {
        Ok(match value {
            Value::String(template) => Value::String(self.resolve(template)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_json(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| Ok((key.clone(), self.resolve_json(item)?)))
                    .collect::<Result<_, HarnessError>>()?,
            ),
            other => other.clone(),
        })
    }
}

/// Keys referenced by `$S{key}` placeholders in `template`, in order of appearance.
pub fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    segments(template).into_iter().filter_map(|segment| match segment {
        Segment::Placeholder(key) => Some(key),
        Segment::Literal(_) => None,
    })
}

pub fn json_placeholders(value: &Value, keys: &mut BTreeSet<String>) {
    match value {
        Value::String(template) => keys.extend(placeholders(template).map(str::to_string)),
        Value::Array(items) => items.iter().for_each(|item| json_placeholders(item, keys)),
        Value::Object(map) => map.values().for_each(|item| json_placeholders(item, keys)),
        _ => {}
    }
}

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

// An unterminated `$S{` is kept as literal text.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        let after_open = &rest[start + PLACEHOLDER_OPEN.len()..];
        let Some(end) = after_open.find(PLACEHOLDER_CLOSE) else {
            break;
        };
        if start > 0 {
            segments.push(Segment::Literal(&rest[..start]));
        }
        segments.push(Segment::Placeholder(&after_open[..end]));
        rest = &after_open[end + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok_eq};
    use serde_json::json;

    fn context() -> ScenarioContext {
        let mut context = ScenarioContext::new();
        context.store("userAccessToken", "abc.def.ghi");
        context.store("bookmarkId", "42");
        context
    }

    #[test]
    fn templates_without_placeholders_are_unchanged() {
        assert_ok_eq!(context().resolve("/bookmarks"), "/bookmarks".to_string());
    }

    #[test]
    fn placeholders_are_substituted_in_place() {
        assert_ok_eq!(
            context().resolve("Bearer $S{userAccessToken}"),
            "Bearer abc.def.ghi".to_string()
        );
        assert_ok_eq!(
            context().resolve("/bookmarks/$S{bookmarkId}/tags/$S{bookmarkId}"),
            "/bookmarks/42/tags/42".to_string()
        );
    }

    #[test]
    fn unknown_keys_are_an_error_not_an_empty_string() {
        let error = assert_err!(context().resolve("/users/$S{userId}"));
        assert!(matches!(error, HarnessError::MissingCapture { key } if key == "userId"));
    }

    #[test]
    fn unterminated_placeholders_stay_literal() {
        assert_ok_eq!(context().resolve("price $S{oops"), "price $S{oops".to_string());
    }

    #[test]
    fn json_strings_are_resolved_recursively() {
        let body = json!({
            "title": "The Fall",
            "ids": ["$S{bookmarkId}", 7],
            "nested": { "token": "$S{userAccessToken}" }
        });
        assert_ok_eq!(
            context().resolve_json(&body),
            json!({
                "title": "The Fall",
                "ids": ["42", 7],
                "nested": { "token": "abc.def.ghi" }
            })
        );
    }

    #[test]
    fn placeholder_keys_are_listed_in_order() {
        let keys: Vec<_> = placeholders("$S{a}-x-$S{b}$S{a}").collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
    }

    #[test]
    fn json_placeholder_keys_are_collected() {
        let mut keys = BTreeSet::new();
        json_placeholders(
            &json!({"userId": "$S{userId}", "list": ["$S{bookmarkId}"], "n": 1}),
            &mut keys,
        );
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["bookmarkId".to_string(), "userId".to_string()]
        );
    }

    #[quickcheck_macros::quickcheck]
    fn text_without_marker_resolves_to_itself(text: String) -> bool {
        text.contains(PLACEHOLDER_OPEN) || ScenarioContext::new().resolve(&text).ok() == Some(text)
    }
}
