// JWT issuance and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// JWT claim set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    pub sub: i32,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Token service for JWT operations
///
/// Stateless apart from the immutable secret and expiration window, so a
/// single instance is shared across concurrently served requests. Signing
/// is pinned to HS256; tokens signed with any other algorithm are rejected
/// even when otherwise well-formed.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration_hours: i64,
}

impl TokenService {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }

    /// Issue a signed token for the given user
    ///
    /// Claims carry `iat = nbf = now` and `exp = now + expiration window`.
    pub fn issue(&self, user_id: i32, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate a token and return its claims
    ///
    /// An expired-but-well-signed token is reported as `ExpiredToken`, a
    /// payload that fails to deserialize as `InvalidTokenClaims`, and
    /// everything else (bad signature, wrong algorithm, malformed
    /// structure) as `InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            ErrorKind::Json(_) => AuthError::InvalidTokenClaims,
            _ => AuthError::InvalidToken,
        })
    }

    /// Extract claims without verifying signature or expiration
    ///
    /// Diagnostic use only (e.g. reading the subject of an expired token);
    /// never an input to an authorization decision.
    pub fn parse_unverified(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) => AuthError::InvalidTokenClaims,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string(), 24)
    }

    /// Build a raw token with explicit timestamps, bypassing `issue`
    fn encode_claims(claims: &Claims, secret: &str, alg: Algorithm) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_validate_roundtrip() {
        let service = test_token_service();
        let token = service.issue(42, "user@example.com").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.iat, claims.nbf);
    }

    #[test]
    fn test_expiration_matches_configured_window() {
        let service = test_token_service();
        let token = service.issue(1, "user@example.com").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "user@example.com".to_string(),
            iat: now - 1000,
            nbf: now - 1000,
            exp: now - 500,
        };
        let token = encode_claims(
            &claims,
            "test_secret_key_for_testing_purposes",
            Algorithm::HS256,
        );

        let service = test_token_service();
        assert!(matches!(
            service.validate(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid_not_expired() {
        let issuer = TokenService::new("secret_one".to_string(), 24);
        let verifier = TokenService::new("secret_two".to_string(), 24);

        let token = issuer.issue(1, "user@example.com").unwrap();
        assert!(issuer.validate(&token).is_ok());
        assert!(matches!(
            verifier.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_other_hmac_algorithm_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "user@example.com".to_string(),
            iat: now,
            nbf: now,
            exp: now + 3600,
        };
        // Well-formed and correctly signed, but not with the pinned algorithm
        let token = encode_claims(
            &claims,
            "test_secret_key_for_testing_purposes",
            Algorithm::HS384,
        );

        let service = test_token_service();
        assert!(matches!(
            service.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();
        for token in ["", "not.a.token", "garbage", "a.b"] {
            assert!(service.validate(token).is_err());
        }
    }

    #[test]
    fn test_parse_unverified_reads_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            email: "user@example.com".to_string(),
            iat: now - 1000,
            nbf: now - 1000,
            exp: now - 500,
        };
        let token = encode_claims(&claims, "some_other_secret_entirely", Algorithm::HS256);

        let service = test_token_service();
        let parsed = service.parse_unverified(&token).unwrap();
        assert_eq!(parsed.sub, 7);
        assert_eq!(parsed.email, "user@example.com");
    }

    proptest! {
        #[test]
        fn prop_claims_carry_identity(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.issue(user_id, &email).unwrap();
            let claims = service.validate(&token).unwrap();
            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
            prop_assert!(claims.exp > claims.iat);
        }

        #[test]
        fn prop_random_strings_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.validate(&malformed).is_err());
        }
    }
}
