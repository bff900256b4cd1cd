//! Domain Service Traits

use crate::error::AuthResult;

/// Password hash comparison trait
///
/// Decides whether a plaintext password matches a stored hash.
/// Timing safety is the implementation's responsibility (the Argon2
/// implementation compares in constant time).
#[trait_variant::make(PasswordVerifier: Send)]
pub trait LocalPasswordVerifier {
    /// Compare a plaintext password against a stored PHC hash string
    async fn compare(&self, plaintext: &str, password_hash: &str) -> AuthResult<bool>;
}
