//! Password Service
//!
//! Argon2id hashing and verification. A mismatch is a normal `false`;
//! only a corrupted stored hash is an error.

use argon2::password_hash::{
    rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use argon2::Argon2;

use crate::error::{PortalError, Result};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    /// Hash a plaintext password into a salted PHC string.
    pub fn hash_password(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PortalError::Internal {
                message: format!("password hashing failed: {}", e),
            })?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored PHC string.
    ///
    /// Comparison is constant-time inside the argon2 crate. Returns
    /// `Ok(false)` on mismatch; an error only means the stored hash is
    /// unparseable (corrupted credential record).
    pub fn verify_password(&self, plaintext: &str, stored: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored).map_err(|e| PortalError::Internal {
            message: format!("corrupted credential record: {}", e),
        })?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PortalError::Internal {
                message: format!("password verification failed: {}", e),
            }),
        }
    }

    /// Minimal strength policy applied at registration.
    pub fn validate_strength(&self, plaintext: &str) -> Result<()> {
        if plaintext.len() < MIN_PASSWORD_LENGTH {
            return Err(PortalError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let service = PasswordService::default();
        let hash = service.hash_password("correct horse battery").unwrap();
        assert!(service.verify_password("correct horse battery", &hash).unwrap());
        assert!(!service.verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = PasswordService::default();
        let h1 = service.hash_password("same input").unwrap();
        let h2 = service.hash_password("same input").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_corrupted_hash_is_an_error_not_a_mismatch() {
        let service = PasswordService::default();
        let err = service.verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, PortalError::Internal { .. }));
    }

    #[test]
    fn test_strength_policy() {
        let service = PasswordService::default();
        assert!(service.validate_strength("short").is_err());
        assert!(service.validate_strength("long enough").is_ok());
    }
}
