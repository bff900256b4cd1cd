//! Access Log Entity
//!
//! Append-only record of an authentication attempt. Created by this
//! crate, persisted by the access-log repository, never updated or
//! deleted afterwards.

use chrono::{DateTime, Utc};
use platform::client::NetworkContext;

use crate::domain::value_object::access_log_id::AccessLogId;

/// One authentication attempt and its outcome
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Entry id (UUID v4), generated here so retried writes stay idempotent
    pub log_id: AccessLogId,
    /// Whether the attempt succeeded
    pub authorized: bool,
    /// Email as supplied by the caller
    pub email: String,
    /// Client IP, if known
    pub ip: Option<String>,
    /// User-Agent header, if present
    pub user_agent: Option<String>,
    /// Host header, if present
    pub host_name: Option<String>,
    /// Origin header, if present
    pub origin: Option<String>,
    /// Rejection reason; only set on unauthorized entries, never
    /// surfaced to the caller
    pub reason: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl AccessLogEntry {
    /// Record a successful authentication
    pub fn authorized(email: impl Into<String>, ctx: &NetworkContext) -> Self {
        Self::build(true, email.into(), None, ctx)
    }

    /// Record a rejected authentication with its internal reason
    pub fn unauthorized(
        email: impl Into<String>,
        reason: &'static str,
        ctx: &NetworkContext,
    ) -> Self {
        Self::build(false, email.into(), Some(reason.to_string()), ctx)
    }

    fn build(authorized: bool, email: String, reason: Option<String>, ctx: &NetworkContext) -> Self {
        Self {
            log_id: AccessLogId::new(),
            authorized,
            email,
            ip: ctx.ip_string(),
            user_agent: ctx.user_agent.clone(),
            host_name: ctx.host_name.clone(),
            origin: ctx.origin.clone(),
            reason,
            created_at: Utc::now(),
        }
    }
}
