use crate::domain::{User, UserChanges};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Fetch user by id from database", skip(pool))]
pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Applies the supplied fields and returns the updated row, or `None` if the user is gone.
#[tracing::instrument(name = "Update user in database", skip(pool))]
pub async fn update_user(
    pool: &PgPool,
    user_id: Uuid,
    changes: &UserChanges,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET email = COALESCE($2, email),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, first_name, last_name, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(changes.email.as_deref())
    .bind(changes.first_name.as_deref())
    .bind(changes.last_name.as_deref())
    .fetch_optional(pool)
    .await
}
