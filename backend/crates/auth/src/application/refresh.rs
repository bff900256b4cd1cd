//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a fresh access + refresh pair.
//! The old refresh token is simply not reused; there is no revocation
//! list.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token_service::{AuthenticationResult, TokenPayload, TokenService};
use crate::domain::repository::UserLookupRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<U>
where
    U: UserLookupRepository,
{
    users: Arc<U>,
    tokens: TokenService,
}

impl<U> RefreshUseCase<U>
where
    U: UserLookupRepository,
{
    pub fn new(users: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            tokens: TokenService::new(config),
        }
    }

    /// Issue a fresh token pair for the holder of a valid refresh token
    ///
    /// Unlike sign-in, this path may disclose "not found" vs "inactive":
    /// the caller already holds a signed refresh token, which is a
    /// stronger credential than an email/password guess.
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<AuthenticationResult> {
        let payload = self.tokens.verify_refresh_token(refresh_token)?;

        // A subject that is not a UUID cannot have been signed by us
        let user_id = payload
            .user_id
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(&UserId::from_uuid(user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.can_authenticate() {
            return Err(AuthError::UserInactive);
        }

        let result = self.tokens.sign(&TokenPayload {
            user_id: payload.user_id,
        })?;

        tracing::info!(user_id = %user.user_id, "Access token refreshed");

        Ok(result)
    }
}
