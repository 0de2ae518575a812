//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{session, CredentialStore};
use crate::domain::{Direction, Nominal};
use crate::error::AppError;
use crate::ledger::{Ledger, MonthSummary, Transaction};

use super::middleware::AuthenticatedUser;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

// Body fields are optional in the schema and validated by hand so that
// missing input yields 400 rather than a deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub nominal: Option<Decimal>,
    #[serde(default)]
    pub occurred_at: Option<NaiveDateTime>,
    /// Parsed into [`Direction`] during validation so an unknown value is
    /// a 400, not a body-level rejection.
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub entries: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MonthSummary>,
}

// =========================================================================
// Routers
// =========================================================================

/// Routes reachable without a session
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Routes behind the auth gate
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route(
            "/transactions",
            post(create_transaction).get(list_transactions),
        )
}

// =========================================================================
// POST /api/register
// =========================================================================

/// Register a new user
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let (username, password) = require_credentials(request.username, request.password)?;

    let store = CredentialStore::new(state.pool.clone());
    let user = store.register(&username, &password).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

// =========================================================================
// POST /api/login
// =========================================================================

/// Verify credentials and install a session cookie
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (username, password) = require_credentials(request.username, request.password)?;

    let store = CredentialStore::new(state.pool.clone());

    // Unknown user and wrong password are indistinguishable to the caller.
    let user = store
        .find_by_username(&username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !CredentialStore::verify_password(&password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = state
        .tokens
        .issue(user.id, &user.username)
        .map_err(|e| AppError::Internal(format!("Token issuance failed: {}", e)))?;

    let cookie = session::session_cookie(&token, state.tokens.max_age_seconds());

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

// =========================================================================
// POST /api/logout
// =========================================================================

/// Clear the session cookie.
///
/// This only tells the client to discard its copy of the token; a copy
/// held elsewhere keeps authenticating until natural expiry.
async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Json(LogoutResponse { success: true }),
    )
}

// =========================================================================
// GET /api/me
// =========================================================================

/// Current identity, straight from the verified claims
async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
        username: user.username,
    })
}

// =========================================================================
// POST /api/transactions
// =========================================================================

/// Record a ledger entry for the authenticated user
async fn create_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let nominal = request
        .nominal
        .ok_or_else(|| AppError::Validation("nominal is required".to_string()))?;
    let nominal =
        Nominal::new(nominal).map_err(|e| AppError::Validation(e.to_string()))?;

    let occurred_at = request
        .occurred_at
        .ok_or_else(|| AppError::Validation("occurredAt is required".to_string()))?;

    let direction: Direction = request
        .direction
        .as_deref()
        .ok_or_else(|| AppError::Validation("direction is required".to_string()))?
        .parse()
        .map_err(|e: String| AppError::Validation(e))?;

    let ledger = Ledger::new(state.pool.clone());

    // Owner comes from the authenticated context, never from the body.
    let transaction = ledger
        .record(
            user.user_id,
            nominal,
            occurred_at,
            direction,
            request.description,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// =========================================================================
// GET /api/transactions
// =========================================================================

/// List the authenticated user's entries, with a month summary when a
/// year/month pair is given
async fn list_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let ledger = Ledger::new(state.pool.clone());

    match (query.year, query.month) {
        (Some(year), Some(month)) => {
            let month_ledger = ledger.list_for_month(user.user_id, year, month).await?;
            Ok(Json(TransactionsResponse {
                entries: month_ledger.entries,
                summary: Some(month_ledger.summary),
            }))
        }
        (None, None) => {
            let entries = ledger.list_for_user(user.user_id).await?;
            Ok(Json(TransactionsResponse {
                entries,
                summary: None,
            }))
        }
        _ => Err(AppError::Validation(
            "year and month must be supplied together".to_string(),
        )),
    }
}

// =========================================================================
// Shared validation
// =========================================================================

/// Both credential fields must be present and non-empty, and fit the
/// schema's column bound.
fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String), AppError> {
    let username = username.unwrap_or_default();
    let password = password.unwrap_or_default();

    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".to_string(),
        ));
    }

    if username.len() > 256 {
        return Err(AppError::Validation(
            "username must be at most 256 characters".to_string(),
        ));
    }

    Ok((username, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialize() {
        let json = r#"{"username": "tester", "password": "password123"}"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username.as_deref(), Some("tester"));
        assert_eq!(request.password.as_deref(), Some("password123"));
    }

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        let request: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(request.username.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn test_create_transaction_request_deserialize() {
        let json = r#"{
            "nominal": 500000.00,
            "occurredAt": "2025-10-01T10:00:00",
            "direction": "income",
            "description": "Gaji"
        }"#;

        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.nominal, Some(Decimal::new(5000000, 1)));
        assert_eq!(request.direction.as_deref(), Some("income"));
        assert_eq!(request.description.as_deref(), Some("Gaji"));
        assert_eq!(
            request.occurred_at.unwrap().to_string(),
            "2025-10-01 10:00:00"
        );
    }

    #[test]
    fn test_create_transaction_request_accepts_string_nominal() {
        let json = r#"{"nominal": "150000.00", "occurredAt": "2025-10-05T15:30:00", "direction": "outcome"}"#;

        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.nominal, Some(Decimal::new(15000000, 2)));
    }

    #[test]
    fn test_require_credentials_rejects_empty() {
        assert!(require_credentials(None, None).is_err());
        assert!(require_credentials(Some("tester".into()), None).is_err());
        assert!(require_credentials(Some("".into()), Some("pw".into())).is_err());
        assert!(require_credentials(Some("   ".into()), Some("pw".into())).is_err());
        assert!(require_credentials(Some("tester".into()), Some("pw".into())).is_ok());
    }

    #[test]
    fn test_transactions_query_defaults() {
        let query: TransactionsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.year.is_none());
        assert!(query.month.is_none());
    }
}
