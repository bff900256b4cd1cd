//! User Entity
//!
//! The stored user record as seen by the authentication core.
//! Creation and mutation belong to the user-management subsystem;
//! this crate only reads it.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, immutable once assigned
    pub user_id: UserId,
    /// Login email (unique)
    pub email: Email,
    /// Argon2id password hash (PHC string), never the plaintext
    pub password_hash: String,
    /// Whether the account may authenticate
    pub active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(email: Email, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account may authenticate
    pub fn can_authenticate(&self) -> bool {
        self.active
    }
}
