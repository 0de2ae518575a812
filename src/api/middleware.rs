//! API Middleware
//!
//! The auth gate and request logging middleware.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::session;
use crate::error::AppError;

use super::AppState;

/// Identity bound into the request after the auth gate has verified the
/// session token. Downstream handlers take this as the owner of every
/// ledger operation; nothing below the gate re-derives identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

// =========================================================================
// Auth gate
// =========================================================================

/// Extract and verify the session token from the request cookie.
///
/// A missing cookie and every verification failure (malformed, bad
/// signature, expired) produce the same 401 response.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = session::token_from_headers(request.headers())
        .ok_or_else(|| AppError::Unauthenticated.into_response())?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Session token rejected");
        AppError::Unauthenticated.into_response()
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

// =========================================================================
// Request logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("cookie", "token=secret.jwt.value".parse().unwrap());
        headers.insert("accept", "application/json".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let cookie = masked.iter().find(|(k, _)| k == "cookie");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");

        assert_eq!(cookie.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"cookie"));
        assert!(SENSITIVE_HEADERS.contains(&"set-cookie"));
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }
}
