//! Password value object.
//!
//! Immutable, compared by value; encapsulates Argon2 hashing so the rest
//! of the crate only ever sees a hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose the hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password.
    ///
    /// Fails with a validation error when the password is shorter than
    /// the configured minimum.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();
        Ok(Self { hash })
    }

    /// Wrap an existing hash (loaded from storage).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain-text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = Password::new("SecurePassword123!").unwrap();
        assert!(password.verify("SecurePassword123!"));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn restored_hash_still_verifies() {
        let password = Password::new("TestPassword123").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("TestPassword123"));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = Password::new("SamePassword123").unwrap();
        let b = Password::new("SamePassword123").unwrap();
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify("SamePassword123"));
        assert!(b.verify("SamePassword123"));
    }

    #[test]
    fn too_short_is_rejected() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("12345678").is_ok());
    }
}
