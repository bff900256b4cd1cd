//! Auth Middleware
//!
//! Middleware for requiring a valid access token on protected routes.
//! Tokens travel in the `Authorization: Bearer <token>` header; any
//! verification failure maps to 401.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub config: Arc<AuthConfig>,
}

/// Verified caller identity, stored in request extensions for
/// downstream handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Middleware that requires a valid bearer access token
pub async fn require_bearer_auth(
    State(state): State<AuthMiddlewareState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_bearer_token(req.headers()) else {
        return Err(AuthError::InvalidToken.into_response());
    };

    let tokens = TokenService::new(state.config.clone());

    match tokens.verify_access_token(&token) {
        Ok(payload) => {
            req.extensions_mut().insert(AuthenticatedUser {
                user_id: payload.user_id,
            });
            Ok(next.run(req).await)
        }
        Err(e) => Err(e.into_response()),
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
