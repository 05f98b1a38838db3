//! Errors returned by the auth handlers and how they map onto HTTP.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use super::validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("Email is not unique!")]
    DuplicateEmail,
    #[error("User not found.")]
    NotFound,
    #[error("Passwords don't match!")]
    InvalidCredentials,
    #[error("Please authenticate using a valid token")]
    Unauthorized,
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), reason = %rejection.body_text(), "rejected request body");
        AuthError::Validation(vec![FieldError::malformed_body()])
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AuthError::Validation(errors) => json!({ "errors": errors }),
            AuthError::Internal(cause) => {
                error!(error = ?cause, "internal error");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
