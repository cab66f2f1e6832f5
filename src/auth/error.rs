// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::{validation_details, ErrorResponse};

/// Authentication and authorization error kinds
///
/// A closed enumeration propagated through result types; the HTTP boundary
/// maps each kind to a status code and response body exactly once, below.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("invalid password: {0}")]
    InvalidPasswordFormat(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("missing authentication token")]
    MissingToken,
    #[error("authorization header must use the Bearer scheme")]
    InvalidAuthScheme,
    #[error("empty bearer token")]
    EmptyToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid token claims")]
    InvalidTokenClaims,
    #[error("no authenticated identity in request context")]
    MissingIdentity,
    #[error("password verification failed")]
    VerificationFailed,
    #[error("password hashing failed")]
    PasswordHashError,
    #[error("token generation failed: {0}")]
    TokenGenerationError(String),
    #[error("database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuthError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("validation_failed", "Invalid input data")
                    .with_details(validation_details(errors)),
            ),
            AuthError::InvalidPasswordFormat(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("invalid_password", msg.clone()),
            ),
            AuthError::InvalidCredentials | AuthError::VerificationFailed => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("invalid_credentials", "Invalid email or password"),
            ),
            AuthError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                ErrorResponse::new("email_exists", "An account with this email already exists"),
            ),
            AuthError::MissingToken => {
                warn!("Missing Authorization header on protected route");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("unauthorized", "Authorization header is required"),
                )
            }
            AuthError::InvalidAuthScheme => {
                warn!("Authorization header without Bearer scheme");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(
                        "unauthorized",
                        "Authorization header must start with 'Bearer '",
                    ),
                )
            }
            AuthError::EmptyToken => {
                warn!("Empty bearer token on protected route");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("unauthorized", "Token is required"),
                )
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("unauthorized", "Token has expired"),
                )
            }
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("unauthorized", "Invalid token"),
                )
            }
            AuthError::InvalidTokenClaims => {
                warn!("Token with malformed claims");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("unauthorized", "Invalid token claims"),
                )
            }
            AuthError::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("unauthorized", "User not authenticated"),
            ),
            AuthError::PasswordHashError => {
                error!("Password hashing error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
