//! Token Service
//!
//! Produces and verifies the two signed, time-limited tokens (HS256):
//! access tokens under one secret, refresh tokens under another. Knows
//! nothing about users, passwords, or stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Claim set embedded in both token types
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject (user ID)
    sub: String,
    /// Issued at (unix timestamp)
    iat: i64,
    /// Expiry (unix timestamp)
    exp: i64,
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: String,
}

/// Freshly signed token pair
///
/// Value object; constructed on every successful sign and never
/// mutated. `expires_in_secs` reports the access-token lifetime, not
/// the refresh one.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in_secs: u64,
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Sign a fresh access + refresh pair for the payload
    ///
    /// The two tokens use distinct secrets, so one can never be
    /// presented where the other is expected. Signing failures mean a
    /// broken secret configuration and propagate unchanged.
    pub fn sign(&self, payload: &TokenPayload) -> AuthResult<AuthenticationResult> {
        let now = Utc::now();

        let access_token = self.encode(
            payload,
            &self.config.access_secret,
            now,
            now + self.config.access_ttl(),
        )?;
        let refresh_token = self.encode(
            payload,
            &self.config.refresh_secret,
            now,
            now + self.config.refresh_ttl(),
        )?;

        Ok(AuthenticationResult {
            access_token,
            refresh_token,
            expires_in_secs: self.config.expires_in_secs(),
        })
    }

    /// Verify an access token, returning its payload
    pub fn verify_access_token(&self, token: &str) -> AuthResult<TokenPayload> {
        self.decode(token, &self.config.access_secret)
    }

    /// Verify a refresh token, returning its payload
    pub fn verify_refresh_token(&self, token: &str) -> AuthResult<TokenPayload> {
        self.decode(token, &self.config.refresh_secret)
    }

    fn encode(
        &self,
        payload: &TokenPayload,
        secret: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = Claims {
            sub: payload.user_id.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenSigning(format!("jwt encode: {e}")))
    }

    /// Malformed tokens, bad signatures, and expired tokens all map to
    /// the same `InvalidToken` so the caller cannot tell which check
    /// failed.
    fn decode(&self, token: &str, secret: &str) -> AuthResult<TokenPayload> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &key, &validation)
            .map(|data| TokenPayload {
                user_id: data.claims.sub,
            })
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(access_hours: u64) -> TokenService {
        let config = AuthConfig::new("access-secret", "refresh-secret", access_hours).unwrap();
        TokenService::new(Arc::new(config))
    }

    fn payload(user_id: &str) -> TokenPayload {
        TokenPayload {
            user_id: user_id.to_string(),
        }
    }

    #[test]
    fn test_sign_round_trip() {
        let service = service(1);
        let result = service.sign(&payload("u1")).unwrap();

        let access = service.verify_access_token(&result.access_token).unwrap();
        assert_eq!(access.user_id, "u1");

        let refresh = service.verify_refresh_token(&result.refresh_token).unwrap();
        assert_eq!(refresh.user_id, "u1");
    }

    #[test]
    fn test_expires_in_matches_access_hours() {
        assert_eq!(service(1).sign(&payload("u1")).unwrap().expires_in_secs, 3600);
        assert_eq!(
            service(48).sign(&payload("u1")).unwrap().expires_in_secs,
            48 * 3600
        );
    }

    #[test]
    fn test_token_independence() {
        // A refresh token must never pass access verification and vice
        // versa: the secrets differ, so the signature check fails.
        let service = service(1);
        let result = service.sign(&payload("u1")).unwrap();

        assert!(matches!(
            service.verify_access_token(&result.refresh_token),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            service.verify_refresh_token(&result.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = service(1);
        assert!(matches!(
            service.verify_access_token("not-a-jwt"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            service.verify_access_token(""),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service(1);
        let result = service.sign(&payload("u1")).unwrap();

        let mut tampered = result.access_token.clone();
        tampered.pop();
        tampered.push('A');

        assert!(matches!(
            service.verify_access_token(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = service(1);
        let other = {
            let config = AuthConfig::new("different-access", "different-refresh", 1).unwrap();
            TokenService::new(Arc::new(config))
        };

        let result = other.sign(&payload("u1")).unwrap();
        assert!(matches!(
            service.verify_access_token(&result.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Craft a token whose expiry is well past the validation leeway
        let service = service(1);
        let now = Utc::now();
        let expired = Claims {
            sub: "u1".to_string(),
            iat: (now - chrono::Duration::hours(3)).timestamp(),
            exp: (now - chrono::Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret("access-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
