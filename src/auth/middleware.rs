// Bearer-token authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{error::AuthError, token::TokenService};

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated identity injected into the request context
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
}

/// Validate the bearer credential carried by a request's headers
///
/// Missing header, wrong scheme, empty token, and invalid/expired tokens
/// each map to a distinct `AuthError` kind; all of them render as 401.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = auth_header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthScheme)?;

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    let claims = tokens.validate(token)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Authentication middleware
///
/// Validates the bearer token and injects the resulting identity into the
/// request extensions for downstream handlers; on failure the request is
/// rejected without invoking the handler. Holds no per-request state of
/// its own, so a single shared `TokenService` serves all requests.
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(request.headers(), &tokens)?;

    debug!("Authenticated request for user {}", user.user_id);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    /// Read the identity placed in the request context by `require_auth`
    ///
    /// Returns an explicit rejection when no identity is present (e.g. the
    /// middleware was not applied to the route) instead of panicking.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingIdentity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    use crate::auth::token::Claims;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string(), 24)
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_token_yields_identity() {
        let tokens = test_token_service();
        let token = tokens.issue(42, "user@example.com").unwrap();

        let user = authenticate(&headers_with_auth(&format!("Bearer {}", token)), &tokens).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "user@example.com");
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let tokens = test_token_service();
        assert!(matches!(
            authenticate(&HeaderMap::new(), &tokens),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_non_bearer_scheme_is_rejected() {
        let tokens = test_token_service();
        for value in ["Basic dXNlcjpwYXNz", "token_without_scheme", "bearer lowercase"] {
            assert!(matches!(
                authenticate(&headers_with_auth(value), &tokens),
                Err(AuthError::InvalidAuthScheme)
            ));
        }
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let tokens = test_token_service();
        assert!(matches!(
            authenticate(&headers_with_auth("Bearer "), &tokens),
            Err(AuthError::EmptyToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = test_token_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "user@example.com".to_string(),
            iat: now - 1000,
            nbf: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            authenticate(&headers_with_auth(&format!("Bearer {}", token)), &tokens),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let tokens = test_token_service();
        assert!(matches!(
            authenticate(&headers_with_auth("Bearer not.a.token"), &tokens),
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_extractor_rejects_when_identity_absent() {
        let req = axum::http::Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingIdentity)));
    }

    #[tokio::test]
    async fn test_extractor_reads_injected_identity() {
        let req = axum::http::Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        parts.extensions.insert(AuthenticatedUser {
            user_id: 7,
            email: "user@example.com".to_string(),
        });

        let user = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.user_id, 7);
    }
}
