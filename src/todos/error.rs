// Todo error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::AuthError;
use crate::error::{validation_details, ErrorResponse};

/// Todo error kinds
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("todo not found")]
    TodoNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("unauthorized access to todo")]
    UnauthorizedAccess,
    #[error("database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            TodoError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("validation_failed", "Invalid input data")
                    .with_details(validation_details(errors)),
            ),
            TodoError::TodoNotFound => {
                debug!("Todo not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("not_found", "Todo not found"),
                )
            }
            // Ownership mismatch is externally indistinguishable from
            // non-existence; only the log tells them apart.
            TodoError::UnauthorizedAccess => {
                warn!("Ownership mismatch on todo access");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("not_found", "Todo not found"),
                )
            }
            TodoError::UserNotFound => {
                error!("Authenticated user no longer exists");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
            TodoError::DatabaseError(msg) => {
                error!("Database error in todos: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for TodoError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DatabaseError(msg) => TodoError::DatabaseError(msg),
            other => TodoError::DatabaseError(other.to_string()),
        }
    }
}
