use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::domain::error::{DomainError, RepositoryError};

/// Error body returned by every route: `{"message": ..., "isError": true}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            DomainError::DuplicateEntity(msg) => Self::new(StatusCode::CONFLICT, msg),
            DomainError::NotFound(msg) => Self::not_found(msg),
            DomainError::Conflict(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            DomainError::AuthenticationFailed | DomainError::InvalidCredentials => {
                Self::unauthorized("Unauthorized")
            }
            // broken invariants, the transaction has already been rolled back
            DomainError::ProfileCreationFailed(msg) | DomainError::ProfileUpdateFailed(msg) => {
                error!(%msg, "profile consistency failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            DomainError::StoreUnavailable(msg) => {
                error!(%msg, "store unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Database temporarily unavailable")
            }
            DomainError::Repository(RepositoryError::NotFound) => Self::not_found("Resource not found"),
            DomainError::Repository(e) => {
                error!(error = %e, "repository failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request",
                )
            }
            DomainError::Token(msg) => {
                error!(%msg, "token failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not issue token")
            }
        }
    }
}

/// Malformed bodies and missing content types keep axum's status and text.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "message": self.message, "isError": true })),
        )
            .into_response()
    }
}
