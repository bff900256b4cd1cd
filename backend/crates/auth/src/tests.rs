//! Unit tests for the auth use cases
//!
//! Collaborators are substituted with in-memory doubles implementing
//! the same traits as the real infrastructure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use platform::client::NetworkContext;
use serde::Serialize;

use crate::application::authenticate::{AuthenticateUseCase, Credential};
use crate::application::config::AuthConfig;
use crate::application::refresh::RefreshUseCase;
use crate::application::token_service::TokenService;
use crate::domain::entity::{access_log::AccessLogEntry, user::User};
use crate::domain::repository::{AccessLogRepository, UserLookupRepository};
use crate::domain::service::PasswordVerifier;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory doubles
// ============================================================================

/// User store + access log double. The log can be switched to fail to
/// exercise the audit-failure path.
#[derive(Clone, Default)]
struct InMemoryStore {
    users: Arc<Mutex<Vec<User>>>,
    entries: Arc<Mutex<Vec<AccessLogEntry>>>,
    fail_log_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    fn with_user(user: User) -> Self {
        let store = Self::default();
        store.users.lock().unwrap().push(user);
        store
    }

    fn entries(&self) -> Vec<AccessLogEntry> {
        self.entries.lock().unwrap().clone()
    }

    fn fail_log_writes(&self) {
        self.fail_log_writes.store(true, Ordering::SeqCst);
    }

    fn insert_entry(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry> {
        if self.fail_log_writes.load(Ordering::SeqCst) {
            return Err(AuthError::Internal("access log unavailable".to_string()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry.clone())
    }
}

impl UserLookupRepository for InMemoryStore {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned())
    }
}

impl AccessLogRepository for InMemoryStore {
    async fn record_authorized(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry> {
        self.insert_entry(entry)
    }

    async fn record_unauthorized(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry> {
        self.insert_entry(entry)
    }
}

/// Password verifier double: a "hash" is just `hashed:<plaintext>`
#[derive(Clone, Copy)]
struct FakeVerifier;

impl PasswordVerifier for FakeVerifier {
    async fn compare(&self, plaintext: &str, password_hash: &str) -> AuthResult<bool> {
        Ok(password_hash == format!("hashed:{plaintext}"))
    }
}

fn fake_hash(plaintext: &str) -> String {
    format!("hashed:{plaintext}")
}

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::new("access-secret", "refresh-secret", 1).unwrap())
}

fn test_user(email: &str, password: &str, active: bool) -> User {
    let mut user = User::new(Email::new(email).unwrap(), fake_hash(password));
    user.active = active;
    user
}

fn test_ctx() -> NetworkContext {
    NetworkContext {
        ip: Some("203.0.113.7".parse().unwrap()),
        user_agent: Some("test-agent/1.0".to_string()),
        host_name: Some("api.example.com".to_string()),
        origin: Some("https://app.example.com".to_string()),
    }
}

fn credential(email: &str, password: &str) -> Credential {
    Credential {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn authenticate_use_case(
    store: &InMemoryStore,
) -> AuthenticateUseCase<InMemoryStore, InMemoryStore, FakeVerifier> {
    AuthenticateUseCase::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(FakeVerifier),
        test_config(),
    )
}

fn refresh_use_case(store: &InMemoryStore) -> RefreshUseCase<InMemoryStore> {
    RefreshUseCase::new(Arc::new(store.clone()), test_config())
}

#[derive(Serialize)]
struct RawClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Sign a refresh token directly so tests control iat/exp and the pair
/// returned by refresh provably differs from the input.
fn refresh_token_for(user_id: &str) -> String {
    let now = Utc::now();
    let claims = RawClaims {
        sub: user_id.to_string(),
        iat: (now - chrono::Duration::minutes(10)).timestamp(),
        exp: (now + chrono::Duration::days(30)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret("refresh-secret".as_bytes()),
    )
    .unwrap()
}

// ============================================================================
// Authenticate
// ============================================================================

mod authenticate {
    use super::*;

    #[tokio::test]
    async fn test_valid_credentials_issue_token_pair() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let use_case = authenticate_use_case(&store);

        let result = use_case
            .execute(credential("a@b.com", "Secret1!"), test_ctx())
            .await
            .unwrap();

        assert!(!result.access_token.is_empty());
        assert!(!result.refresh_token.is_empty());
        assert_eq!(result.expires_in_secs, 3600);

        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].authorized);
        assert_eq!(entries[0].email, "a@b.com");
        assert!(entries[0].reason.is_none());
        assert_eq!(entries[0].ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(entries[0].user_agent.as_deref(), Some("test-agent/1.0"));
    }

    #[tokio::test]
    async fn test_access_token_decodes_to_user_id() {
        let user = test_user("a@b.com", "Secret1!", true);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);
        let use_case = authenticate_use_case(&store);

        let result = use_case
            .execute(credential("a@b.com", "Secret1!"), test_ctx())
            .await
            .unwrap();

        let tokens = TokenService::new(test_config());
        let payload = tokens.verify_access_token(&result.access_token).unwrap();
        assert_eq!(payload.user_id, user_id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let use_case = authenticate_use_case(&store);

        let err = use_case
            .execute(credential("a@b.com", "wrong"), test_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].authorized);
        assert_eq!(entries[0].reason.as_deref(), Some("Invalid password"));
    }

    #[tokio::test]
    async fn test_unknown_email_rejected() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let use_case = authenticate_use_case(&store);

        let err = use_case
            .execute(credential("nobody@x.com", "x"), test_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reason.as_deref(), Some("E-mail not found"));
        assert_eq!(entries[0].email, "nobody@x.com");
    }

    #[tokio::test]
    async fn test_inactive_user_rejected_even_with_correct_password() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", false));
        let use_case = authenticate_use_case(&store);

        let err = use_case
            .execute(credential("a@b.com", "Secret1!"), test_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let entries = store.entries();
        assert_eq!(entries[0].reason.as_deref(), Some("Inactive user"));
    }

    #[tokio::test]
    async fn test_rejection_is_uniform_across_reasons() {
        // The caller must not be able to tell the three failure causes
        // apart from the returned error.
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let inactive = InMemoryStore::with_user(test_user("c@d.com", "Secret1!", false));

        let wrong_password = authenticate_use_case(&store)
            .execute(credential("a@b.com", "wrong"), test_ctx())
            .await
            .unwrap_err();
        let unknown_email = authenticate_use_case(&store)
            .execute(credential("nobody@x.com", "x"), test_ctx())
            .await
            .unwrap_err();
        let inactive_user = authenticate_use_case(&inactive)
            .execute(credential("c@d.com", "Secret1!"), test_ctx())
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(unknown_email.to_string(), inactive_user.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid e-mail or password");
    }

    #[tokio::test]
    async fn test_exactly_one_entry_per_attempt() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let use_case = authenticate_use_case(&store);

        let _ = use_case
            .execute(credential("a@b.com", "Secret1!"), test_ctx())
            .await;
        let _ = use_case
            .execute(credential("a@b.com", "wrong"), test_ctx())
            .await;
        let _ = use_case
            .execute(credential("nobody@x.com", "x"), test_ctx())
            .await;

        let entries = store.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.iter().filter(|e| e.authorized).count(), 1);
        assert_eq!(entries.iter().filter(|e| !e.authorized).count(), 2);
    }

    #[tokio::test]
    async fn test_audit_failure_blocks_success() {
        // An authentication that cannot be recorded must not succeed
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        store.fail_log_writes();
        let use_case = authenticate_use_case(&store);

        let err = use_case
            .execute(credential("a@b.com", "Secret1!"), test_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn test_audit_failure_masks_nothing_on_rejection() {
        // The log failure propagates in place of the uniform rejection
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        store.fail_log_writes();
        let use_case = authenticate_use_case(&store);

        let err = use_case
            .execute(credential("a@b.com", "wrong"), test_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn test_malformed_email_treated_as_not_found() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let use_case = authenticate_use_case(&store);

        let err = use_case
            .execute(credential("not-an-email", "x"), test_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let entries = store.entries();
        assert_eq!(entries[0].reason.as_deref(), Some("E-mail not found"));
    }

    #[tokio::test]
    async fn test_empty_network_context_is_accepted() {
        let store = InMemoryStore::with_user(test_user("a@b.com", "Secret1!", true));
        let use_case = authenticate_use_case(&store);

        let result = use_case
            .execute(
                credential("a@b.com", "Secret1!"),
                NetworkContext::default(),
            )
            .await;
        assert!(result.is_ok());

        let entries = store.entries();
        assert!(entries[0].ip.is_none());
        assert!(entries[0].user_agent.is_none());
    }
}

// ============================================================================
// Refresh
// ============================================================================

mod refresh {
    use super::*;

    #[tokio::test]
    async fn test_valid_refresh_rotates_pair() {
        let user = test_user("a@b.com", "Secret1!", true);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);
        let use_case = refresh_use_case(&store);

        let old_refresh = refresh_token_for(&user_id);
        let result = use_case.execute(&old_refresh).await.unwrap();

        // Fresh pair: neither token is the one presented
        assert_ne!(result.refresh_token, old_refresh);
        assert_ne!(result.access_token, old_refresh);
        assert_eq!(result.expires_in_secs, 3600);

        // The new access token still identifies the original user
        let tokens = TokenService::new(test_config());
        let payload = tokens.verify_access_token(&result.access_token).unwrap();
        assert_eq!(payload.user_id, user_id);
    }

    #[tokio::test]
    async fn test_refresh_writes_no_access_log() {
        let user = test_user("a@b.com", "Secret1!", true);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);
        let use_case = refresh_use_case(&store);

        use_case.execute(&refresh_token_for(&user_id)).await.unwrap();
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let user = test_user("a@b.com", "Secret1!", true);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);
        let use_case = refresh_use_case(&store);

        let mut tampered = refresh_token_for(&user_id);
        tampered.pop();
        tampered.push('A');

        let err = use_case.execute(&tampered).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_access_token_cannot_be_used_as_refresh() {
        // Signed under the access secret, so refresh verification fails
        let user = test_user("a@b.com", "Secret1!", true);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);

        let tokens = TokenService::new(test_config());
        let pair = tokens
            .sign(&crate::application::token_service::TokenPayload { user_id })
            .unwrap();

        let err = refresh_use_case(&store)
            .execute(&pair.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_expired_refresh_rejected() {
        let user = test_user("a@b.com", "Secret1!", true);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);

        let now = Utc::now();
        let claims = RawClaims {
            sub: user_id,
            iat: (now - chrono::Duration::days(31)).timestamp(),
            exp: (now - chrono::Duration::days(1)).timestamp(),
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("refresh-secret".as_bytes()),
        )
        .unwrap();

        let err = refresh_use_case(&store).execute(&expired).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let store = InMemoryStore::default();
        let use_case = refresh_use_case(&store);

        let token = refresh_token_for(&uuid::Uuid::new_v4().to_string());
        let err = use_case.execute(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_inactive_user_rejected() {
        let user = test_user("a@b.com", "Secret1!", false);
        let user_id = user.user_id.to_string();
        let store = InMemoryStore::with_user(user);
        let use_case = refresh_use_case(&store);

        let err = use_case
            .execute(&refresh_token_for(&user_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserInactive));
        assert_eq!(err.to_string(), "User is no longer active");
    }

    #[tokio::test]
    async fn test_non_uuid_subject_rejected() {
        let store = InMemoryStore::default();
        let use_case = refresh_use_case(&store);

        let token = refresh_token_for("not-a-uuid");
        let err = use_case.execute(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
