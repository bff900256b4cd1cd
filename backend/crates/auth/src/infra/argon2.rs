//! Argon2 Password Verifier
//!
//! Implements the hash-compare collaborator over `platform::password`.

use platform::password::HashedPassword;

use crate::domain::service::PasswordVerifier;
use crate::error::{AuthError, AuthResult};

/// Argon2id-backed password verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl Argon2Verifier {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordVerifier for Argon2Verifier {
    async fn compare(&self, plaintext: &str, password_hash: &str) -> AuthResult<bool> {
        // A stored hash that fails to parse is data corruption, not a
        // wrong password
        let hash = HashedPassword::from_phc_string(password_hash)
            .map_err(|e| AuthError::Internal(format!("Stored password hash is invalid: {e}")))?;

        Ok(hash.verify(plaintext))
    }
}
