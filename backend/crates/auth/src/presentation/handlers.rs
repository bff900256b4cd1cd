//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use std::sync::Arc;

use platform::client::extract_network_context;

use crate::application::config::AuthConfig;
use crate::application::{AuthenticateUseCase, Credential, RefreshUseCase};
use crate::domain::repository::{AccessLogRepository, UserLookupRepository};
use crate::domain::service::PasswordVerifier;
use crate::error::AuthResult;
use crate::presentation::dto::{RefreshRequest, SignInRequest, TokenResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, V>
where
    R: UserLookupRepository + AccessLogRepository + Clone + Send + Sync + 'static,
    V: PasswordVerifier + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub verifier: Arc<V>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R, V>(
    State(state): State<AuthAppState<R, V>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserLookupRepository + AccessLogRepository + Clone + Send + Sync + 'static,
    V: PasswordVerifier + Clone + Send + Sync + 'static,
{
    let ctx = extract_network_context(&headers, Some(addr.ip()));

    let use_case = AuthenticateUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.verifier.clone(),
        state.config.clone(),
    );

    let credential = Credential {
        email: req.email,
        password: req.password,
    };

    let result = use_case.execute(credential, ctx).await?;

    Ok(Json(result.into()))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R, V>(
    State(state): State<AuthAppState<R, V>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserLookupRepository + AccessLogRepository + Clone + Send + Sync + 'static,
    V: PasswordVerifier + Clone + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());

    let result = use_case.execute(&req.refresh_token).await?;

    Ok(Json(result.into()))
}
