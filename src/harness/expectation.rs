use super::context::{ScenarioContext, json_placeholders, placeholders};
use super::driver::Exchange;
use super::error::HarnessError;
use super::json::{contains, lookup};
use serde_json::Value;
use std::collections::BTreeSet;

const MAX_EXCERPT_CHARS: usize = 300;

/// A check a response has to pass. String parts may reference stored values.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    Status(u16),
    BodyContains(String),
    JsonLike(Value),
    JsonLength { path: String, length: usize },
    JsonPathPresent(String),
}

/// A failed expectation, with the literal expected and actual values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{check}: expected {expected}, got {actual}")]
pub struct AssertionFailure {
    pub check: String,
    pub expected: String,
    pub actual: String,
}

impl AssertionFailure {
    fn new(check: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl Expectation {
    pub(crate) fn resolve(&self, context: &ScenarioContext) -> Result<Self, HarnessError> {
        Ok(match self {
            Expectation::BodyContains(text) => Expectation::BodyContains(context.resolve(text)?),
            Expectation::JsonLike(value) => Expectation::JsonLike(context.resolve_json(value)?),
            other => other.clone(),
        })
    }

    pub(crate) fn collect_placeholders(&self, keys: &mut BTreeSet<String>) {
        match self {
            Expectation::BodyContains(text) => {
                keys.extend(placeholders(text).map(str::to_string))
            }
            Expectation::JsonLike(value) => json_placeholders(value, keys),
            _ => {}
        }
    }

    pub fn check(&self, exchange: &Exchange) -> Result<(), AssertionFailure> {
        match self {
            Expectation::Status(expected) => {
                let actual = exchange.status.as_u16();
                if actual == *expected {
                    Ok(())
                } else {
                    Err(AssertionFailure::new(
                        "status",
                        expected.to_string(),
                        format!("{} with body {}", actual, excerpt(&exchange.body)),
                    ))
                }
            }
            Expectation::BodyContains(text) => {
                if exchange.body.contains(text.as_str()) {
                    Ok(())
                } else {
                    Err(AssertionFailure::new(
                        "body contains",
                        format!("{:?}", text),
                        excerpt(&exchange.body),
                    ))
                }
            }
            Expectation::JsonLike(expected) => {
                let actual = json_body(exchange, "json like", &expected.to_string())?;
                if contains(actual, expected) {
                    Ok(())
                } else {
                    Err(AssertionFailure::new(
                        "json like",
                        expected.to_string(),
                        excerpt(&actual.to_string()),
                    ))
                }
            }
            Expectation::JsonLength { path, length } => {
                let check = format!("json length at `{}`", path);
                let actual = json_body(exchange, &check, &length.to_string())?;
                match lookup(actual, path) {
                    Some(Value::Array(items)) if items.len() == *length => Ok(()),
                    Some(Value::Array(items)) => Err(AssertionFailure::new(
                        check,
                        length.to_string(),
                        items.len().to_string(),
                    )),
                    Some(other) => Err(AssertionFailure::new(
                        check,
                        format!("an array of {}", length),
                        excerpt(&other.to_string()),
                    )),
                    None => Err(AssertionFailure::new(check, length.to_string(), "nothing")),
                }
            }
            Expectation::JsonPathPresent(path) => {
                let check = format!("json value at `{}`", path);
                let actual = json_body(exchange, &check, "a value")?;
                match lookup(actual, path) {
                    None | Some(Value::Null) => {
                        Err(AssertionFailure::new(check, "a value", "nothing"))
                    }
                    Some(Value::String(text)) if text.is_empty() => {
                        Err(AssertionFailure::new(check, "a value", "an empty string"))
                    }
                    Some(_) => Ok(()),
                }
            }
        }
    }
}

fn json_body<'a>(
    exchange: &'a Exchange,
    check: &str,
    expected: &str,
) -> Result<&'a Value, AssertionFailure> {
    exchange.json().ok_or_else(|| {
        AssertionFailure::new(
            check,
            expected,
            format!("a non-JSON body {}", excerpt(&exchange.body)),
        )
    })
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= MAX_EXCERPT_CHARS {
        return format!("{:?}", text);
    }
    let head: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
    format!("{:?}...", head)
}
