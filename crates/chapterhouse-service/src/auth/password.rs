//! Member credential hashing.
//!
//! Credentials are stored as Argon2id PHC strings; every hash carries its
//! own random salt, so two members with the same password never share a
//! stored form.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Hashes a member's password into an Argon2id PHC string with a fresh salt.
///
/// ## Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            ServiceError::InvalidConfiguration(format!("Password hashing failed: {err}"))
        })
}

/// ## Summary
/// Checks a login attempt against the member's stored hash.
///
/// ## Errors
/// Returns `ServiceError::NotAuthenticated` when the password does not
/// match, or a configuration error when the stored value is not a valid PHC
/// string.
pub fn verify_password(password: &str, stored_hash: &str) -> ServiceResult<()> {
    let parsed = PasswordHash::new(stored_hash).map_err(|err| {
        ServiceError::InvalidConfiguration(format!("Stored credential is malformed: {err}"))
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|err| {
            tracing::trace!("Password verification failed: {}", err);
            ServiceError::NotAuthenticated
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn member_password_round_trips() {
        let hash = hash_password("chapter-house-2026").expect("hash should succeed");
        assert!(verify_password("chapter-house-2026", &hash).is_ok());
    }

    #[test_log::test]
    fn wrong_password_is_not_authenticated() {
        let hash = hash_password("correct-horse").expect("hash should succeed");
        assert!(matches!(
            verify_password("wrong-pony", &hash),
            Err(ServiceError::NotAuthenticated)
        ));
    }

    #[test_log::test]
    fn equal_passwords_get_distinct_hashes() {
        let first = hash_password("board-login").expect("hash should succeed");
        let second = hash_password("board-login").expect("hash should succeed");
        assert_ne!(first, second);
        assert!(verify_password("board-login", &second).is_ok());
    }

    #[test_log::test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-left-by-import").is_err());
    }
}
