// Password hashing and verification service

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::fmt;

use crate::auth::error::AuthError;

/// An Argon2 PHC-format password digest. Can only be obtained by hashing a
/// plaintext or by loading a value that already parses as a digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    pub fn hash_password(password: &str) -> Result<PasswordDigest, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordDigest(hash.to_string()))
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; a digest that does not parse is an error.
    pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(digest).map_err(|_| AuthError::PasswordHashError)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::PasswordHashError),
        }
    }

    /// Whether `value` is already an Argon2 digest rather than a plaintext
    pub fn is_hashed(value: &str) -> bool {
        PasswordHash::new(value)
            .map(|hash| hash.algorithm.as_str().starts_with("argon2"))
            .unwrap_or(false)
    }

    /// Turn an incoming password value into a digest, hashing only plaintext.
    /// Already-hashed values pass through unchanged so they are never
    /// double-hashed.
    pub fn prepare(value: &str) -> Result<PasswordDigest, AuthError> {
        if Self::is_hashed(value) {
            tracing::debug!("Password already hashed, skipping");
            Ok(PasswordDigest(value.to_string()))
        } else {
            Self::hash_password(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_verifies_original_password() {
        let digest = PasswordService::hash_password("password@123").unwrap();
        assert!(PasswordService::verify_password("password@123", digest.as_str()).unwrap());
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let digest = PasswordService::hash_password("password@123").unwrap();
        assert!(!PasswordService::verify_password("password@124", digest.as_str()).unwrap());
    }

    #[test]
    fn test_digest_never_contains_plaintext() {
        let digest = PasswordService::hash_password("hunter2hunter2").unwrap();
        assert!(!digest.as_str().contains("hunter2hunter2"));
        assert!(digest.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = PasswordService::hash_password("password123").unwrap();
        let b = PasswordService::hash_password("password123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_hashed_detects_digests() {
        let digest = PasswordService::hash_password("password123").unwrap();
        assert!(PasswordService::is_hashed(digest.as_str()));
        assert!(!PasswordService::is_hashed("password123"));
        assert!(!PasswordService::is_hashed("$2b$10$notanargondigestatall"));
        assert!(!PasswordService::is_hashed(""));
    }

    #[test]
    fn test_prepare_does_not_rehash_digest() {
        let digest = PasswordService::hash_password("password123").unwrap();
        let prepared = PasswordService::prepare(digest.as_str()).unwrap();
        assert_eq!(prepared, digest);
    }

    #[test]
    fn test_prepare_hashes_plaintext() {
        let prepared = PasswordService::prepare("new-password-1").unwrap();
        assert!(PasswordService::is_hashed(prepared.as_str()));
        assert!(PasswordService::verify_password("new-password-1", prepared.as_str()).unwrap());
    }

    #[test]
    fn test_unparseable_digest_is_an_error() {
        assert!(PasswordService::verify_password("password123", "not-a-digest").is_err());
    }

    #[test]
    fn test_debug_redacts_digest() {
        let digest = PasswordService::hash_password("password123").unwrap();
        assert_eq!(format!("{:?}", digest), "PasswordDigest(..)");
    }

    proptest! {
        // Argon2 is deliberately slow, keep the case count low
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_roundtrip(
            password in "[a-zA-Z0-9!@#$%^&*]{1,32}",
            other in "[a-zA-Z0-9!@#$%^&*]{1,32}"
        ) {
            let digest = PasswordService::hash_password(&password)?;
            prop_assert!(PasswordService::verify_password(&password, digest.as_str())?);
            if other != password {
                prop_assert!(!PasswordService::verify_password(&other, digest.as_str())?);
            }
        }
    }
}
