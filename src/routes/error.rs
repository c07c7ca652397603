use crate::routes::constants::{
    ERROR_ACCESS_DENIED, ERROR_AUTHENTICATION_REQUIRED, ERROR_SOMETHING_WENT_WRONG,
};
use crate::telemetry::error_chain_fmt;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// JSON body returned for every error response
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human readable error message
    pub error: String,
}

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{}", ERROR_AUTHENTICATION_REQUIRED)]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ApiError {
    pub fn access_denied() -> Self {
        ApiError::Forbidden(ERROR_ACCESS_DENIED)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self {
            ApiError::UnexpectedError(_) => {
                // Keep the cause chain in the logs, never in the response.
                tracing::error!("Internal server error: {:?}", self);
                ERROR_SOMETHING_WENT_WRONG.to_string()
            }
            other => other.to_string(),
        };
        (
            self.status_code(),
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}
