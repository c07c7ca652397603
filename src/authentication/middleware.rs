use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use std::ops::Deref;
use uuid::Uuid;

use crate::routes::ApiError;
use crate::startup::AppState;

#[derive(Copy, Clone, Debug)]
pub struct UserId(Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for UserId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejects requests without a valid `Authorization: Bearer <token>` header
/// and makes the authenticated [`UserId`] available as a request extension.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();
    match authenticate(&mut parts, &state).await {
        Ok(user_id) => {
            parts.extensions.insert(user_id);
            let req = Request::from_parts(parts, body);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<UserId, ApiError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Missing or malformed bearer credentials: {}", e);
                ApiError::Unauthorized
            })?;

    let claims = state.token_issuer.verify(bearer.token()).map_err(|e| {
        tracing::debug!("Rejected access token: {:?}", e);
        ApiError::Unauthorized
    })?;

    Ok(UserId(claims.sub))
}
