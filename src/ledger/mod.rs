//! Ledger module
//!
//! Per-user dated monetary entries and their range-filtered aggregates.
//! Entries are created once and read-only afterwards; every query is
//! scoped to the owning user.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Direction, Nominal};
use crate::error::AppError;

/// A single ledger entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nominal: Decimal,
    pub occurred_at: NaiveDateTime,
    pub direction: Direction,
    pub description: Option<String>,
}

/// Month view: entries plus exact-decimal totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub total_income: Decimal,
    pub total_outcome: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct MonthLedger {
    pub entries: Vec<Transaction>,
    pub summary: MonthSummary,
}

/// Ledger service over the transactions table
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: PgPool,
}

impl Ledger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a new entry for the given user. The user id comes from the
    /// authenticated context, never from client input.
    pub async fn record(
        &self,
        user_id: Uuid,
        nominal: Nominal,
        occurred_at: NaiveDateTime,
        direction: Direction,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, nominal, occurred_at, direction, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(nominal.value())
        .bind(occurred_at)
        .bind(direction)
        .bind(&description)
        .execute(&self.pool)
        .await?;

        Ok(Transaction {
            id,
            user_id,
            nominal: nominal.value(),
            occurred_at,
            direction,
            description,
        })
    }

    /// All entries for a user, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        let rows: Vec<(Uuid, Uuid, Decimal, NaiveDateTime, Direction, Option<String>)> =
            sqlx::query_as(
                r#"
                SELECT id, user_id, nominal, occurred_at, direction, description
                FROM transactions
                WHERE user_id = $1
                ORDER BY occurred_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Transaction::from_row).collect())
    }

    /// Entries for a user within one calendar month, newest first, plus
    /// income/outcome totals and their balance. The month is the half-open
    /// interval [first day, first day of next month).
    pub async fn list_for_month(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthLedger, AppError> {
        let (start, end) = month_bounds(year, month)?;

        let rows: Vec<(Uuid, Uuid, Decimal, NaiveDateTime, Direction, Option<String>)> =
            sqlx::query_as(
                r#"
                SELECT id, user_id, nominal, occurred_at, direction, description
                FROM transactions
                WHERE user_id = $1 AND occurred_at >= $2 AND occurred_at < $3
                ORDER BY occurred_at DESC
                "#,
            )
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let entries: Vec<Transaction> = rows.into_iter().map(Transaction::from_row).collect();
        let summary = summarize(&entries);

        Ok(MonthLedger { entries, summary })
    }
}

impl Transaction {
    fn from_row(
        (id, user_id, nominal, occurred_at, direction, description): (
            Uuid,
            Uuid,
            Decimal,
            NaiveDateTime,
            Direction,
            Option<String>,
        ),
    ) -> Self {
        Self {
            id,
            user_id,
            nominal,
            occurred_at,
            direction,
            description,
        }
    }
}

/// Compute the half-open month interval [start, end).
///
/// Rejects out-of-range months and years instead of wrapping.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(format!(
            "month must be between 1 and 12 (got {})",
            month
        )));
    }
    if !(1970..=9999).contains(&year) {
        return Err(AppError::Validation(format!(
            "year must be between 1970 and 9999 (got {})",
            year
        )));
    }

    let first = |y: i32, m: u32| {
        NaiveDate::from_ymd_opt(y, m, 1)
            .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
    };

    let start = first(year, month)
        .ok_or_else(|| AppError::Validation(format!("invalid month {}-{}", year, month)))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = first(next_year, next_month)
        .ok_or_else(|| AppError::Validation(format!("invalid month {}-{}", next_year, next_month)))?;

    Ok((start, end))
}

/// Sum income and outcome over a set of entries with exact decimal
/// arithmetic; balance = income - outcome.
fn summarize(entries: &[Transaction]) -> MonthSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_outcome = Decimal::ZERO;

    for entry in entries {
        match entry.direction {
            Direction::Income => total_income += entry.nominal,
            Direction::Outcome => total_outcome += entry.nominal,
        }
    }

    MonthSummary {
        total_income,
        total_outcome,
        balance: total_income - total_outcome,
    }
}
