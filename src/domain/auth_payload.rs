use crate::authentication::{Credentials, MAX_PASSWORD_LENGTH};
use secrecy::Secret;
use serde::Deserialize;
use validator::Validate;

/// Body accepted by both `/auth/signup` and `/auth/signin`.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct AuthPayload {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, max = MAX_PASSWORD_LENGTH))]
    #[schema(format = Password)]
    pub password: String,
}

impl From<AuthPayload> for Credentials {
    fn from(payload: AuthPayload) -> Self {
        Credentials {
            email: payload.email,
            password: Secret::new(payload.password),
        }
    }
}
