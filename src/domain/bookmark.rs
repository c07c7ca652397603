use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /bookmarks`. The owner always comes from the access token;
/// a `userId` sent by the client is not part of the schema and gets dropped.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct NewBookmark {
    #[validate(length(min = 1, max = 512))]
    pub title: String,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub link: String,
}

/// Body of `PATCH /bookmarks/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct BookmarkChanges {
    #[validate(length(min = 1, max = 512))]
    pub title: Option<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub link: Option<String>,
}
