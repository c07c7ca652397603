use super::{AccessTokenResponse, access_token_for};
use crate::authentication::{AuthError, Credentials, validate_credentials};
use crate::domain::AuthPayload;
use crate::routes::constants::ERROR_CREDENTIALS_INCORRECT;
use crate::routes::{ApiError, ErrorResponse, ValidatedJson};
use crate::startup::AppState;
use axum::extract::State;
use axum::response::Json;

/// Sign in
///
/// Exchanges valid credentials for an access token.
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "auth",
    request_body = AuthPayload,
    responses(
        (status = 200, description = "Signed in", body = AccessTokenResponse),
        (status = 400, description = "Missing or invalid email or password", body = ErrorResponse),
        (status = 403, description = "Unknown email or wrong password", body = ErrorResponse),
    )
)]
#[tracing::instrument(
    name = "Sign in",
    skip(state, payload),
    fields(email = %payload.email, user_id = tracing::field::Empty)
)]
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthPayload>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let credentials = Credentials::from(payload);
    let email = credentials.email.clone();

    let user_id = validate_credentials(credentials, &state.db)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials(_) | AuthError::CredentialsTaken => {
                ApiError::Forbidden(ERROR_CREDENTIALS_INCORRECT)
            }
            AuthError::UnexpectedError(e) => e.into(),
        })?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));

    Ok(Json(access_token_for(&state.token_issuer, user_id, &email)?))
}
