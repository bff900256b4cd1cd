//! Repository Traits
//!
//! Interfaces for data access. Implementation is in the infrastructure
//! layer; tests substitute in-memory doubles.

use crate::domain::entity::{access_log::AccessLogEntry, user::User};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User lookup trait
///
/// Pure reads against the user store; user records are owned and
/// mutated by the user-management subsystem.
#[trait_variant::make(UserLookupRepository: Send)]
pub trait LocalUserLookupRepository {
    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;
}

/// Access log trait
///
/// Append-only audit sink. Both methods return the persisted entry.
#[trait_variant::make(AccessLogRepository: Send)]
pub trait LocalAccessLogRepository {
    /// Persist a successful authentication entry
    async fn record_authorized(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry>;

    /// Persist a rejected authentication entry
    async fn record_unauthorized(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry>;
}
