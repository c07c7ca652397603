use super::{AccessTokenResponse, access_token_for};
use crate::authentication::{AuthError, Credentials, register_user};
use crate::domain::AuthPayload;
use crate::routes::constants::ERROR_CREDENTIALS_TAKEN;
use crate::routes::{ApiError, ErrorResponse, ValidatedJson};
use crate::startup::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

/// Create an account
///
/// Registers a new user and returns an access token for it.
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = AuthPayload,
    responses(
        (status = 201, description = "Account created", body = AccessTokenResponse),
        (status = 400, description = "Missing or invalid email or password", body = ErrorResponse),
        (status = 403, description = "Email already registered", body = ErrorResponse),
    )
)]
#[tracing::instrument(
    name = "Sign up",
    skip(state, payload),
    fields(email = %payload.email, user_id = tracing::field::Empty)
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthPayload>,
) -> Result<(StatusCode, Json<AccessTokenResponse>), ApiError> {
    let credentials = Credentials::from(payload);
    let email = credentials.email.clone();

    let user_id = register_user(credentials, &state.db)
        .await
        .map_err(|e| match e {
            AuthError::CredentialsTaken => ApiError::Forbidden(ERROR_CREDENTIALS_TAKEN),
            AuthError::InvalidCredentials(e) | AuthError::UnexpectedError(e) => e.into(),
        })?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));

    let response = access_token_for(&state.token_issuer, user_id, &email)?;
    Ok((StatusCode::CREATED, Json(response)))
}
