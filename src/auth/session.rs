//! Session transport
//!
//! Carries the session token in an HTTP cookie. The cookie is HttpOnly
//! (invisible to scripts) and SameSite=Lax, and its Max-Age matches the
//! token's validity window. Clearing the cookie on logout only instructs
//! this client to discard its copy; it does not revoke the token.

use axum::http::HeaderMap;

/// Cookie name carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Build the Set-Cookie value that installs a session token.
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Extract the session token from a request's Cookie header, if present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
        {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}
