use super::queries;
use crate::authentication::UserId;
use crate::domain::User;
use crate::routes::{ApiError, ErrorResponse};
use crate::startup::AppState;
use anyhow::Context;
use axum::Extension;
use axum::extract::State;
use axum::response::Json;

/// Get the current user
///
/// Returns the user the bearer token was issued to.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Get current user", skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<User>, ApiError> {
    queries::get_user_by_id(&state.db, *user_id)
        .await
        .context("Failed to fetch the current user")?
        // A valid token for a user that no longer exists authenticates nobody.
        .map(Json)
        .ok_or(ApiError::Unauthorized)
}
