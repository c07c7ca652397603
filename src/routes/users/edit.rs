use super::queries;
use crate::authentication::UserId;
use crate::domain::{User, UserChanges};
use crate::routes::constants::{ERROR_CREDENTIALS_TAKEN, ERROR_USER_NOT_FOUND};
use crate::routes::{ApiError, ErrorResponse, ValidatedJson};
use crate::startup::AppState;
use axum::Extension;
use axum::extract::State;
use axum::response::Json;

/// Edit the current user
///
/// Updates the supplied fields of the authenticated user and returns the result.
#[utoipa::path(
    patch,
    path = "/users",
    tag = "users",
    security(("bearer" = [])),
    request_body = UserChanges,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid field values", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Email already registered", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Edit current user", skip(state, changes))]
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    ValidatedJson(changes): ValidatedJson<UserChanges>,
) -> Result<Json<User>, ApiError> {
    match queries::update_user(&state.db, *user_id, &changes).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::NotFound(ERROR_USER_NOT_FOUND)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::Forbidden(ERROR_CREDENTIALS_TAKEN))
        }
        Err(e) => Err(ApiError::UnexpectedError(
            anyhow::Error::new(e).context("Failed to update the current user"),
        )),
    }
}
