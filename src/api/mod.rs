//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::routing::get;
use axum::Router;
use sqlx::PgPool;

use crate::auth::TokenCodec;

pub use routes::create_router;

/// Shared application state: the connection pool plus the token codec
/// built from the configured signing secret.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(pool: PgPool, tokens: TokenCodec) -> Self {
        Self { pool, tokens }
    }
}

/// Assemble the full application router.
///
/// Protected routes sit behind the auth gate; register/login/logout and
/// the health check do not. Axum layers run bottom-up, so the order here
/// is logging -> auth -> handler.
pub fn router(state: AppState) -> Router {
    let protected = routes::create_router().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth_middleware,
    ));

    let api_router = routes::public_router().merge(protected);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router)
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
