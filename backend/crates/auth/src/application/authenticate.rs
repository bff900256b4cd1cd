//! Authenticate Use Case
//!
//! Verifies an email/password pair, records the attempt in the access
//! log, and issues a token pair on success.

use std::sync::Arc;

use platform::client::NetworkContext;

use crate::application::config::AuthConfig;
use crate::application::token_service::{AuthenticationResult, TokenPayload, TokenService};
use crate::domain::entity::{access_log::AccessLogEntry, user::User};
use crate::domain::repository::{AccessLogRepository, UserLookupRepository};
use crate::domain::service::PasswordVerifier;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Email/password pair supplied by a caller; lives only for the
/// duration of one request and is never persisted.
pub struct Credential {
    pub email: String,
    pub password: String,
}

/// Why verification rejected the credential. Feeds the access log
/// only; the caller always sees the uniform `InvalidCredentials`.
enum Rejection {
    EmailNotFound,
    Inactive,
    WrongPassword,
}

impl Rejection {
    const fn reason(&self) -> &'static str {
        match self {
            Rejection::EmailNotFound => "E-mail not found",
            Rejection::Inactive => "Inactive user",
            Rejection::WrongPassword => "Invalid password",
        }
    }
}

/// Authenticate use case
pub struct AuthenticateUseCase<U, L, V>
where
    U: UserLookupRepository,
    L: AccessLogRepository,
    V: PasswordVerifier,
{
    users: Arc<U>,
    access_log: Arc<L>,
    verifier: Arc<V>,
    tokens: TokenService,
}

impl<U, L, V> AuthenticateUseCase<U, L, V>
where
    U: UserLookupRepository,
    L: AccessLogRepository,
    V: PasswordVerifier,
{
    pub fn new(
        users: Arc<U>,
        access_log: Arc<L>,
        verifier: Arc<V>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            users,
            access_log,
            verifier,
            tokens: TokenService::new(config),
        }
    }

    /// Authenticate a credential within its network context
    ///
    /// The access-log write happens before this function returns on
    /// both paths, and a failed write propagates: an unaudited
    /// authentication must never succeed silently.
    pub async fn execute(
        &self,
        credential: Credential,
        ctx: NetworkContext,
    ) -> AuthResult<AuthenticationResult> {
        match self.verify_credentials(&credential).await? {
            Err(rejection) => {
                let entry =
                    AccessLogEntry::unauthorized(credential.email.clone(), rejection.reason(), &ctx);
                self.access_log.record_unauthorized(&entry).await?;

                tracing::warn!(
                    email = %credential.email,
                    reason = rejection.reason(),
                    "Authentication rejected"
                );

                Err(AuthError::InvalidCredentials)
            }
            Ok(user) => {
                let entry = AccessLogEntry::authorized(credential.email.clone(), &ctx);
                self.access_log.record_authorized(&entry).await?;

                let result = self.tokens.sign(&TokenPayload {
                    user_id: user.user_id.to_string(),
                })?;

                tracing::info!(user_id = %user.user_id, "User authenticated");

                Ok(result)
            }
        }
    }

    /// Run the three verification checks in order, stopping at the
    /// first failure. Dependency errors (lookup, hash compare) pass
    /// through untouched; only business rejections are collected.
    async fn verify_credentials(
        &self,
        credential: &Credential,
    ) -> AuthResult<Result<User, Rejection>> {
        // A malformed email cannot reference a stored user
        let email = match Email::new(&credential.email) {
            Ok(email) => email,
            Err(_) => return Ok(Err(Rejection::EmailNotFound)),
        };

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(Err(Rejection::EmailNotFound));
        };

        if !user.can_authenticate() {
            return Ok(Err(Rejection::Inactive));
        }

        let password_valid = self
            .verifier
            .compare(&credential.password, &user.password_hash)
            .await?;

        if !password_valid {
            return Ok(Err(Rejection::WrongPassword));
        }

        Ok(Ok(user))
    }
}
