//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{access_log::AccessLogEntry, user::User};
use crate::domain::repository::{AccessLogRepository, UserLookupRepository};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_entry(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry> {
        sqlx::query(
            r#"
            INSERT INTO access_logs (
                log_id,
                authorized,
                email,
                client_ip,
                user_agent,
                host_name,
                origin,
                reason,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (log_id) DO NOTHING
            "#,
        )
        .bind(entry.log_id.as_uuid())
        .bind(entry.authorized)
        .bind(&entry.email)
        .bind(&entry.ip)
        .bind(&entry.user_agent)
        .bind(&entry.host_name)
        .bind(&entry.origin)
        .bind(&entry.reason)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry.clone())
    }
}

// ============================================================================
// User Lookup Implementation
// ============================================================================

impl UserLookupRepository for PgAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                active,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                active,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }
}

// ============================================================================
// Access Log Implementation
// ============================================================================

impl AccessLogRepository for PgAuthRepository {
    async fn record_authorized(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry> {
        self.insert_entry(entry).await
    }

    async fn record_unauthorized(&self, entry: &AccessLogEntry) -> AuthResult<AccessLogEntry> {
        self.insert_entry(entry).await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash: self.password_hash,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

