//! SQLite store access
//!
//! The query core only reads. The schema here describes the tables it reads
//! and is used to set up embedded and test databases.

pub mod schema;

pub use sqlx::SqlitePool;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Open a private in-memory database with the schema applied
///
/// Limited to one connection: every SQLite in-memory connection is its own
/// database, so a larger pool would see empty tables.
pub async fn open_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query(schema::SCHEMA).execute(&pool).await?;

    tracing::debug!("In-memory store initialized");
    Ok(pool)
}
