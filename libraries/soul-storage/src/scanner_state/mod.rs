//! File scanner bookkeeping storage
//!
//! Durable key/value state that decides how much of the library the next
//! scan pass has to revisit. Missing keys read as `0`.
//!
//! # Example
//!
//! ```rust,no_run
//! use soul_storage::scanner_state;
//!
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! // A composition was added: the next pass must cover everything
//! let version = scanner_state::bump_current_version(pool).await?;
//!
//! // A pass finished
//! scanner_state::set(pool, scanner_state::KEY_LAST_VERSION, version).await?;
//! # Ok(())
//! # }
//! ```

use crate::StorageError;
use sqlx::{Executor, Sqlite, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// Current library generation
pub const KEY_CURRENT_VERSION: &str = "file_scanner.current_version";

/// Library generation covered by the last completed pass
pub const KEY_LAST_VERSION: &str = "file_scanner.last_version";

/// Completion time of the last full pass (epoch millis)
pub const KEY_LAST_COMPLETE_SCAN_TIME: &str = "file_scanner.last_complete_scan_time";

/// Read a value, defaulting to 0
pub async fn get(pool: &SqlitePool, key: &str) -> Result<i64> {
    let value: Option<i64> = sqlx::query_scalar("SELECT value FROM scanner_state WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value.unwrap_or(0))
}

/// Write a value
pub async fn set(pool: &SqlitePool, key: &str, value: i64) -> Result<()> {
    sqlx::query(
        "INSERT INTO scanner_state (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Atomically increment the current version and return the new value
///
/// Accepts any executor so it can run inside the transaction that changed
/// the library.
pub async fn bump_current_version<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let version: i64 = sqlx::query_scalar(
        "INSERT INTO scanner_state (key, value) VALUES (?, 1)
         ON CONFLICT(key) DO UPDATE SET value = value + 1
         RETURNING value",
    )
    .bind(KEY_CURRENT_VERSION)
    .fetch_one(executor)
    .await?;

    Ok(version)
}
