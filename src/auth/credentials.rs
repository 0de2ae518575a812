//! Credential store
//!
//! Persists username/password-hash pairs and verifies login credentials.
//! Username uniqueness is enforced by the table's UNIQUE constraint; a
//! concurrent duplicate registration loses at the INSERT, not at a pre-check.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Unique-violation SQLSTATE reported by Postgres
const UNIQUE_VIOLATION: &str = "23505";

/// A registered user. The hash never leaves this layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Store for user credentials
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: PgPool,
}

impl CredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user. Hashes the raw password before anything is
    /// persisted; the raw value is neither stored nor logged.
    ///
    /// # Errors
    /// - `AppError::DuplicateUsername` when the username is already taken
    ///   (surfaced from the storage-level uniqueness violation)
    pub async fn register(&self, username: &str, raw_password: &str) -> Result<User, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::DuplicateUsername
            }
            _ => AppError::Database(e),
        })?;

        Ok(User {
            id,
            username: username.to_string(),
            password_hash,
        })
    }

    /// Look up a user by exact (case-sensitive) username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row: Option<(Uuid, String, String)> = sqlx::query_as(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, password_hash)| User {
            id,
            username,
            password_hash,
        }))
    }

    /// Verify a raw password against a stored argon2 hash.
    ///
    /// A hash that fails to parse is a data problem, not a wrong password.
    pub fn verify_password(raw_password: &str, stored_hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(raw_password.as_bytes(), &parsed)
            .is_ok())
    }
}
