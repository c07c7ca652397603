pub mod queries;

use crate::authentication::UserId;
use crate::domain::{Bookmark, BookmarkChanges, NewBookmark};
use crate::routes::constants::ERROR_BOOKMARK_NOT_FOUND;
use crate::routes::{ApiError, ErrorResponse, ValidatedJson};
use crate::startup::AppState;
use anyhow::Context;
use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Get the caller's bookmarks
///
/// Lists every bookmark owned by the authenticated user, newest first.
#[utoipa::path(
    get,
    path = "/bookmarks",
    tag = "bookmarks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Bookmarks of the current user", body = Vec<Bookmark>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Get bookmarks", skip(state))]
pub async fn get_bookmarks(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = queries::get_bookmarks_of_user(&state.db, *user_id)
        .await
        .context("Failed to fetch bookmarks")?;
    Ok(Json(bookmarks))
}

/// Get a bookmark by id
///
/// Bookmarks of other users are reported as not found.
#[utoipa::path(
    get,
    path = "/bookmarks/{id}",
    tag = "bookmarks",
    security(("bearer" = [])),
    params(
        ("id" = Uuid, Path, description = "Bookmark unique identifier")
    ),
    responses(
        (status = 200, description = "Bookmark found", body = Bookmark),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Bookmark not found", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Get bookmark by id", skip(state))]
pub async fn get_bookmark_by_id(
    State(state): State<AppState>,
    Path(bookmark_id): Path<Uuid>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Bookmark>, ApiError> {
    queries::get_bookmark_by_id(&state.db, bookmark_id)
        .await
        .context("Failed to fetch bookmark")?
        .filter(|bookmark| bookmark.user_id == *user_id)
        .map(Json)
        .ok_or(ApiError::NotFound(ERROR_BOOKMARK_NOT_FOUND))
}

/// Create a bookmark
///
/// The bookmark is owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/bookmarks",
    tag = "bookmarks",
    security(("bearer" = [])),
    request_body = NewBookmark,
    responses(
        (status = 201, description = "Bookmark created", body = Bookmark),
        (status = 400, description = "Invalid bookmark", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Create bookmark", skip(state, new_bookmark))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    ValidatedJson(new_bookmark): ValidatedJson<NewBookmark>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let bookmark = queries::insert_bookmark(&state.db, *user_id, &new_bookmark)
        .await
        .context("Failed to create bookmark")?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Edit a bookmark
///
/// Updates the supplied fields of a bookmark owned by the authenticated user.
#[utoipa::path(
    patch,
    path = "/bookmarks/{id}",
    tag = "bookmarks",
    security(("bearer" = [])),
    params(
        ("id" = Uuid, Path, description = "Bookmark unique identifier")
    ),
    request_body = BookmarkChanges,
    responses(
        (status = 200, description = "Bookmark updated", body = Bookmark),
        (status = 400, description = "Invalid field values", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Bookmark belongs to another user", body = ErrorResponse),
        (status = 404, description = "Bookmark not found", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Edit bookmark", skip(state, changes))]
pub async fn edit_bookmark(
    State(state): State<AppState>,
    Path(bookmark_id): Path<Uuid>,
    Extension(user_id): Extension<UserId>,
    ValidatedJson(changes): ValidatedJson<BookmarkChanges>,
) -> Result<Json<Bookmark>, ApiError> {
    ensure_owned(&state.db, bookmark_id, user_id).await?;
    queries::update_bookmark(&state.db, bookmark_id, &changes)
        .await
        .context("Failed to update bookmark")?
        .map(Json)
        .ok_or(ApiError::NotFound(ERROR_BOOKMARK_NOT_FOUND))
}

/// Delete a bookmark
///
/// Permanently deletes a bookmark owned by the authenticated user.
#[utoipa::path(
    delete,
    path = "/bookmarks/{id}",
    tag = "bookmarks",
    security(("bearer" = [])),
    params(
        ("id" = Uuid, Path, description = "Bookmark unique identifier")
    ),
    responses(
        (status = 204, description = "Bookmark deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Bookmark belongs to another user", body = ErrorResponse),
        (status = 404, description = "Bookmark not found", body = ErrorResponse),
    )
)]
#[tracing::instrument(name = "Delete bookmark", skip(state))]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(bookmark_id): Path<Uuid>,
    Extension(user_id): Extension<UserId>,
) -> Result<StatusCode, ApiError> {
    ensure_owned(&state.db, bookmark_id, user_id).await?;
    if queries::delete_bookmark(&state.db, bookmark_id)
        .await
        .context("Failed to delete bookmark")?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(ERROR_BOOKMARK_NOT_FOUND))
    }
}

async fn ensure_owned(pool: &PgPool, bookmark_id: Uuid, user_id: UserId) -> Result<(), ApiError> {
    let bookmark = queries::get_bookmark_by_id(pool, bookmark_id)
        .await
        .context("Failed to fetch bookmark")?
        .ok_or(ApiError::NotFound(ERROR_BOOKMARK_NOT_FOUND))?;
    if bookmark.user_id != *user_id {
        tracing::warn!(owner = %bookmark.user_id, "Bookmark access denied");
        return Err(ApiError::access_denied());
    }
    Ok(())
}
