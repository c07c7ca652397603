use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user as exposed over the API. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of the current user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub last_name: Option<String>,
}
