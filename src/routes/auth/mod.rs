mod signin;
mod signup;

pub use signin::*;
pub use signup::*;

use crate::authentication::TokenIssuer;
use crate::routes::ApiError;
use anyhow::Context;
use serde::Serialize;
use uuid::Uuid;

/// Body returned by a successful sign-up or sign-in
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccessTokenResponse {
    /// Bearer token to send as `Authorization: Bearer <access_token>`
    pub access_token: String,
}

fn access_token_for(
    issuer: &TokenIssuer,
    user_id: Uuid,
    email: &str,
) -> Result<AccessTokenResponse, ApiError> {
    let access_token = issuer
        .issue(user_id, email)
        .context("Failed to issue an access token")?;
    Ok(AccessTokenResponse { access_token })
}
