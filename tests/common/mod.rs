//! Common test utilities

use axum::Router;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use fintrack::auth::TokenCodec;
use fintrack::{api, AppState};

/// Signing secret shared by the app under test and token-forging helpers
pub const TEST_SECRET: &str = "integration-test-secret";

/// Connect to the test database
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB")
}

/// Build the application router exactly as the binary does
pub fn test_app(pool: PgPool) -> Router {
    let tokens = TokenCodec::new(TEST_SECRET, Duration::hours(24));
    api::router(AppState::new(pool, tokens))
}

/// A codec signing with the same secret as the app under test
pub fn test_codec(validity: Duration) -> TokenCodec {
    TokenCodec::new(TEST_SECRET, validity)
}

/// Usernames are unique per test run so tests stay independent of
/// leftover rows and of each other.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Pull the bare token out of a Set-Cookie header value
/// ("token=...; HttpOnly; ..." -> "...").
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .expect("Set-Cookie has at least one attribute")
        .trim()
        .to_string()
}
