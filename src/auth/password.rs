// Password hashing and verification

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::password_hash::{PasswordHasher as _, PasswordVerifier as _};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::auth::error::AuthError;

/// Minimum allowed password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum allowed password length, in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Default time-cost factor (number of Argon2 passes)
pub const DEFAULT_COST: u32 = Params::DEFAULT_T_COST;

/// Password hasher using Argon2id with a fresh per-call salt
///
/// Stateless apart from its immutable parameters; safe to call from
/// multiple threads concurrently.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the default cost factor
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    /// Create a hasher with a custom time-cost factor
    ///
    /// The cost is clamped to the algorithm's valid range (Argon2 requires
    /// at least one pass); memory and parallelism stay at the crate's
    /// recommended defaults.
    pub fn with_cost(cost: u32) -> Self {
        let t_cost = cost.max(1);
        let params = Params::new(Params::DEFAULT_M_COST, t_cost, Params::DEFAULT_P_COST, None)
            .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a password, producing a PHC-format string
    ///
    /// A fresh salt is generated per call, so hashing the same password
    /// twice yields different hashes.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        validate_length(password)?;

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a stored hash
    ///
    /// Mismatches and unparsable stored hashes both surface as
    /// `VerificationFailed`, never as a raw library error.
    pub fn verify(&self, hash: &str, password: &str) -> Result<(), AuthError> {
        validate_length(password)?;

        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::VerificationFailed)?;
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::VerificationFailed)
    }

    /// Validate password strength requirements without hashing
    pub fn validate_strength(password: &str) -> Result<(), AuthError> {
        validate_length(password)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_length(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH || length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::InvalidPasswordFormat(format!(
            "Password must be between {} and {} characters",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("password123").unwrap();

        assert!(hasher.verify(&hash, "password123").is_ok());
        assert!(matches!(
            hasher.verify(&hash, "password124"),
            Err(AuthError::VerificationFailed)
        ));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("password123").unwrap();
        let second = hasher.hash("password123").unwrap();

        // Fresh per-call salt
        assert_ne!(first, second);
        assert!(hasher.verify(&first, "password123").is_ok());
        assert!(hasher.verify(&second, "password123").is_ok());
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let hasher = PasswordHasher::new();

        assert!(hasher.hash(&"a".repeat(8)).is_ok());
        assert!(hasher.hash(&"a".repeat(128)).is_ok());
        assert!(matches!(
            hasher.hash(&"a".repeat(7)),
            Err(AuthError::InvalidPasswordFormat(_))
        ));
        assert!(matches!(
            hasher.hash(&"a".repeat(129)),
            Err(AuthError::InvalidPasswordFormat(_))
        ));
    }

    #[test]
    fn test_verify_checks_length_too() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("password123").unwrap();

        assert!(matches!(
            hasher.verify(&hash, "short"),
            Err(AuthError::InvalidPasswordFormat(_))
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let hasher = PasswordHasher::new();
        assert!(matches!(
            hasher.verify("not-a-phc-string", "password123"),
            Err(AuthError::VerificationFailed)
        ));
    }

    #[test]
    fn test_cost_is_clamped() {
        // Zero passes is below Argon2's valid range; the hasher must still work
        let hasher = PasswordHasher::with_cost(0);
        let hash = hasher.hash("password123").unwrap();
        assert!(hasher.verify(&hash, "password123").is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_valid_passwords_roundtrip(password in "[a-zA-Z0-9]{8,32}") {
            let hasher = PasswordHasher::with_cost(1);
            let hash = hasher.hash(&password).unwrap();
            prop_assert!(hasher.verify(&hash, &password).is_ok());
        }

        #[test]
        fn prop_out_of_bounds_passwords_rejected(password in "[a-zA-Z0-9]{1,7}") {
            let hasher = PasswordHasher::with_cost(1);
            prop_assert!(matches!(
                hasher.hash(&password),
                Err(AuthError::InvalidPasswordFormat(_))
            ));
            prop_assert!(matches!(
                hasher.verify("irrelevant", &password),
                Err(AuthError::InvalidPasswordFormat(_))
            ));
        }
    }
}
