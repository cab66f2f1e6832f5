// Authentication service - business logic layer

use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::AuthResponse,
    password::PasswordHasher,
    repository::UserRepository,
    token::{Claims, TokenService},
};

/// Authentication service coordinating registration, login, and token
/// validation
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user and issue a token for the created account
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        PasswordHasher::validate_strength(password)?;

        // Hashing is CPU-bound; keep it off the async worker threads
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| AuthError::PasswordHashError)??;

        let user = self.users.create(email, &password_hash).await?;
        let token = self.tokens.issue(user.id, &user.email)?;

        tracing::info!("Registered new user with id {}", user.id);
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Authenticate a user by email and password
    ///
    /// Unknown email and wrong password collapse into the same
    /// `InvalidCredentials` so callers cannot enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&stored_hash, &password))
            .await
            .map_err(|_| AuthError::PasswordHashError)?
            .map_err(|_| AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(user.id, &user.email)?;

        tracing::debug!("User {} logged in", user.id);
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.validate(token)
    }
}
