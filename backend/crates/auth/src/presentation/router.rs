//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccessLogRepository, UserLookupRepository};
use crate::domain::service::PasswordVerifier;
use crate::infra::argon2::Argon2Verifier;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with the PostgreSQL repository and Argon2
/// verifier
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, Argon2Verifier::new(), config)
}

/// Create a generic Auth router for any repository/verifier
/// implementation
pub fn auth_router_generic<R, V>(repo: R, verifier: V, config: AuthConfig) -> Router
where
    R: UserLookupRepository + AccessLogRepository + Clone + Send + Sync + 'static,
    V: PasswordVerifier + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        verifier: Arc::new(verifier),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signin", post(handlers::sign_in::<R, V>))
        .route("/refresh", post(handlers::refresh::<R, V>))
        .with_state(state)
}
