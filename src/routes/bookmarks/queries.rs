use crate::domain::{Bookmark, BookmarkChanges, NewBookmark};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Fetch bookmarks of user from database", skip(pool))]
pub async fn get_bookmarks_of_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Bookmark>, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(
        r#"
        SELECT id, user_id, title, description, link, created_at, updated_at
        FROM bookmarks
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

#[tracing::instrument(name = "Fetch bookmark by id from database", skip(pool))]
pub async fn get_bookmark_by_id(
    pool: &PgPool,
    bookmark_id: Uuid,
) -> Result<Option<Bookmark>, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(
        r#"
        SELECT id, user_id, title, description, link, created_at, updated_at
        FROM bookmarks
        WHERE id = $1
        "#,
    )
    .bind(bookmark_id)
    .fetch_optional(pool)
    .await
}

#[tracing::instrument(name = "Insert bookmark into database", skip(pool))]
pub async fn insert_bookmark(
    pool: &PgPool,
    user_id: Uuid,
    new_bookmark: &NewBookmark,
) -> Result<Bookmark, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(
        r#"
        INSERT INTO bookmarks (id, user_id, title, description, link)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, title, description, link, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&new_bookmark.title)
    .bind(new_bookmark.description.as_deref())
    .bind(&new_bookmark.link)
    .fetch_one(pool)
    .await
}

#[tracing::instrument(name = "Update bookmark in database", skip(pool))]
pub async fn update_bookmark(
    pool: &PgPool,
    bookmark_id: Uuid,
    changes: &BookmarkChanges,
) -> Result<Option<Bookmark>, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(
        r#"
        UPDATE bookmarks
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            link = COALESCE($4, link),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, title, description, link, created_at, updated_at
        "#,
    )
    .bind(bookmark_id)
    .bind(changes.title.as_deref())
    .bind(changes.description.as_deref())
    .bind(changes.link.as_deref())
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was removed.
#[tracing::instrument(name = "Delete bookmark from database", skip(pool))]
pub async fn delete_bookmark(pool: &PgPool, bookmark_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM bookmarks
        WHERE id = $1
        "#,
    )
    .bind(bookmark_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
