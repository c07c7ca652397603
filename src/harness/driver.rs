use super::error::HarnessError;
use super::interaction::RequestBody;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

/// A request with every placeholder already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// One request/response pair as seen by the harness.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: Method,
    pub url: String,
    pub status: StatusCode,
    pub body: String,
    json: Option<Value>,
}

impl Exchange {
    pub fn new(method: Method, url: String, status: StatusCode, body: String) -> Self {
        let json = serde_json::from_str(&body).ok();
        Self {
            method,
            url,
            status,
            body,
            json,
        }
    }

    /// The body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }
}

/// Sends prepared requests to one running instance, one at a time.
#[derive(Debug, Clone)]
pub struct HttpDriver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDriver {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HarnessError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Result<Self, HarnessError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| HarnessError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, HarnessError> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse(&url).map_err(|e| HarnessError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }

    #[tracing::instrument(
        name = "Send request",
        skip(self, request),
        fields(method = %request.method, path = %request.path, status = tracing::field::Empty)
    )]
    pub async fn send(&self, request: PreparedRequest) -> Result<Exchange, HarnessError> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.client.request(request.method.clone(), url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Text(text)) => builder.header(CONTENT_TYPE, "text/plain").body(text),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());
        let body = response.text().await?;

        Ok(Exchange::new(request.method, url.to_string(), status, body))
    }
}
