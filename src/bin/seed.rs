//! Development seeding tool
//!
//! Wipes the ledger and registers a demo user with a pair of sample
//! October entries. Run with: cargo run --bin seed

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;

use fintrack::auth::CredentialStore;
use fintrack::domain::{Direction, Nominal};
use fintrack::ledger::Ledger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")?;

    println!("Seeding database...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Drop old data, transactions first because of the FK.
    sqlx::query("DELETE FROM transactions").execute(&pool).await?;
    sqlx::query("DELETE FROM users").execute(&pool).await?;

    let store = CredentialStore::new(pool.clone());
    let user = store
        .register("tester", "password123")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed user: {}", e))?;

    println!("Created user '{}' ({})", user.username, user.id);

    let ledger = Ledger::new(pool.clone());
    let entries = [
        (
            Decimal::new(50000000, 2),
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            Direction::Income,
            "Gaji bulanan",
        ),
        (
            Decimal::new(15000000, 2),
            NaiveDate::from_ymd_opt(2025, 10, 5).unwrap().and_hms_opt(15, 30, 0).unwrap(),
            Direction::Outcome,
            "Tagihan listrik",
        ),
    ];

    for (nominal, occurred_at, direction, description) in entries {
        let nominal = Nominal::new(nominal).map_err(|e| anyhow::anyhow!("{}", e))?;
        ledger
            .record(
                user.id,
                nominal,
                occurred_at,
                direction,
                Some(description.to_string()),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed transaction: {}", e))?;
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await?;

    println!("Seeding completed: 1 user, {} transactions", count);

    Ok(())
}
