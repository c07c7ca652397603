use super::context::{ScenarioContext, json_placeholders, placeholders};
use super::driver::{Exchange, HttpDriver, PreparedRequest};
use super::error::HarnessError;
use super::expectation::Expectation;
use super::json::{capture_text, lookup};
use reqwest::{Method, Url};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Text(String),
}

/// Store the value found at `path` in the response body under `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub key: String,
    pub path: String,
}

/// One request, the expectations on its response and the values to keep from it.
///
/// Any string given to the builder (path, path parameters, headers, body
/// strings, expected texts) may reference stored values as `$S{key}`.
#[derive(Debug, Clone)]
pub struct Interaction {
    method: Method,
    path: String,
    path_params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    expectations: Vec<Expectation>,
    captures: Vec<Capture>,
}

impl Interaction {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: Vec::new(),
            headers: Vec::new(),
            body: None,
            expectations: Vec::new(),
            captures: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Binds the `{name}` segment of the path.
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header("Authorization", value)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expectations.push(Expectation::Status(status));
        self
    }

    pub fn expect_body_contains(mut self, text: impl Into<String>) -> Self {
        self.expectations.push(Expectation::BodyContains(text.into()));
        self
    }

    pub fn expect_json_like(mut self, expected: Value) -> Self {
        self.expectations.push(Expectation::JsonLike(expected));
        self
    }

    /// Expects the whole body to be an array of `length` elements.
    pub fn expect_json_length(self, length: usize) -> Self {
        self.expect_json_length_at("", length)
    }

    pub fn expect_json_length_at(mut self, path: impl Into<String>, length: usize) -> Self {
        self.expectations.push(Expectation::JsonLength {
            path: path.into(),
            length,
        });
        self
    }

    pub fn expect_json_path(mut self, path: impl Into<String>) -> Self {
        self.expectations.push(Expectation::JsonPathPresent(path.into()));
        self
    }

    pub fn stores(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.captures.push(Capture {
            key: key.into(),
            path: path.into(),
        });
        self
    }

    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// `METHOD /path` as written, before substitution.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Every stored key this interaction reads.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = placeholders(&self.path).map(str::to_string).collect();
        for (_, value) in self.path_params.iter().chain(&self.headers) {
            keys.extend(placeholders(value).map(str::to_string));
        }
        match &self.body {
            Some(RequestBody::Json(value)) => json_placeholders(value, &mut keys),
            Some(RequestBody::Text(text)) => keys.extend(placeholders(text).map(str::to_string)),
            None => {}
        }
        for expectation in &self.expectations {
            expectation.collect_placeholders(&mut keys);
        }
        keys
    }

    pub fn prepare(&self, context: &ScenarioContext) -> Result<PreparedRequest, HarnessError> {
        let path = self.bind_path(context)?;

        let headers = self
            .headers
            .iter()
            .map(|(name, value)| Ok((name.clone(), context.resolve(value)?)))
            .collect::<Result<Vec<_>, HarnessError>>()?;

        let body = match &self.body {
            Some(RequestBody::Json(value)) => Some(RequestBody::Json(context.resolve_json(value)?)),
            Some(RequestBody::Text(text)) => Some(RequestBody::Text(context.resolve(text)?)),
            None => None,
        };

        Ok(PreparedRequest {
            method: self.method.clone(),
            path,
            headers,
            body,
        })
    }

    /// Substitutes `{name}` parameters of the path template with their
    /// percent-encoded values. Stored values are resolved as written.
    fn bind_path(&self, context: &ScenarioContext) -> Result<String, HarnessError> {
        let unbound = || HarnessError::UnboundPathParam {
            path: self.path.clone(),
        };
        let mut path = String::with_capacity(self.path.len());
        let mut rest = self.path.as_str();
        while let Some(start) = find_path_param(rest) {
            path.push_str(&context.resolve(&rest[..start])?);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(unbound)?;
            let value = self
                .path_params
                .iter()
                .find(|(name, _)| name == &after[..end])
                .map(|(_, value)| value)
                .ok_or_else(unbound)?;
            path.push_str(&encode_path_segment(&context.resolve(value)?)?);
            rest = &after[end + 1..];
        }
        path.push_str(&context.resolve(rest)?);
        Ok(path)
    }

    /// Sends the request, checks every expectation in order and, only if all of
    /// them pass, stores the captured values into `context`.
    #[tracing::instrument(name = "Run interaction", skip_all, fields(interaction = %self.describe()))]
    pub async fn execute(
        &self,
        driver: &HttpDriver,
        context: &mut ScenarioContext,
    ) -> Result<Exchange, HarnessError> {
        let request = self.prepare(context)?;
        let expectations = self
            .expectations
            .iter()
            .map(|expectation| expectation.resolve(context))
            .collect::<Result<Vec<_>, _>>()?;

        let exchange = driver.send(request).await?;
        for expectation in &expectations {
            expectation.check(&exchange)?;
        }

        for capture in &self.captures {
            let value = exchange
                .json()
                .and_then(|json| lookup(json, &capture.path))
                .filter(|value| !value.is_null())
                .ok_or_else(|| HarnessError::CaptureNotFound {
                    key: capture.key.clone(),
                    path: capture.path.clone(),
                })?;
            context.store(capture.key.clone(), capture_text(value));
        }
        Ok(exchange)
    }
}

// Position of the next `{` that opens a path parameter rather than a `$S{key}` reference.
fn find_path_param(template: &str) -> Option<usize> {
    template
        .char_indices()
        .find(|&(index, c)| c == '{' && !template[..index].ends_with("$S"))
        .map(|(index, _)| index)
}

fn encode_path_segment(value: &str) -> Result<String, HarnessError> {
    let invalid = || HarnessError::InvalidUrl {
        url: value.to_string(),
        reason: "cannot be used as a path segment".to_string(),
    };
    let mut url = Url::parse("http://localhost/").map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}
