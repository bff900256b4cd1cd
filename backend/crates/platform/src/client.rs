//! Client identification utilities
//!
//! Common functions for describing the network origin of a request
//! via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Network context of an inbound request
///
/// Carries whatever origin information the transport layer could
/// determine. Every field is optional; the context is passed through
/// unmodified to consumers (e.g. access logging).
#[derive(Debug, Clone, Default)]
pub struct NetworkContext {
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
    /// User-Agent header value
    pub user_agent: Option<String>,
    /// Host header value
    pub host_name: Option<String>,
    /// Origin header value
    pub origin: Option<String>,
}

impl NetworkContext {
    /// Get IP as string (for storage)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract the network context from request headers
///
/// Unlike session-fingerprint schemes, nothing here is required: a
/// request with no identifying headers yields an empty context.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address (fallback)
pub fn extract_network_context(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> NetworkContext {
    let header_string = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    NetworkContext {
        ip: extract_client_ip(headers, direct_ip),
        user_agent: header_string(header::USER_AGENT),
        host_name: header_string(header::HOST),
        origin: header_string(header::ORIGIN),
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // X-Forwarded-For: first IP in the list is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
