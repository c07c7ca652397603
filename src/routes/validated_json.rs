//! Request body extraction with the API's validation policy applied.
//!
//! Bodies are read as raw bytes whatever their `Content-Type`, parsed as JSON
//! into the target schema and then checked against its `validator` rules.
//! Properties that are not part of the schema are dropped by deserialization,
//! so a payload carrying extra fields still validates on what remains.
//! Every failure is reported as `400 Bad Request`.

use crate::routes::ApiError;
use crate::routes::constants::ERROR_BODY_REQUIRED;
use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        parse_and_validate(&bytes).map(ValidatedJson)
    }
}

pub fn parse_and_validate<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest(ERROR_BODY_REQUIRED.to_string()));
    }
    let value: T = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
    value
        .validate()
        .map_err(|e| ApiError::BadRequest(describe(&e)))?;
    Ok(value)
}

/// Flattens field errors into `"field: message"` pairs, preferring custom messages.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{}: invalid value ({})", field, error.code),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
