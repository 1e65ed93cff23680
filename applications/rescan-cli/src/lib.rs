//! Soul Rescan CLI
//!
//! Command-line front end for the incremental file scanner: manages the
//! composition catalog in a local SQLite database and runs scan passes
//! against it.

pub mod commands;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{CliError, Result};

use soul_storage::LocalStorageContext;

/// Open the configured database and bring its schema up to date
pub async fn open_storage(config: &AppConfig) -> Result<LocalStorageContext> {
    let pool = soul_storage::create_pool(&config.storage.database_url)
        .await
        .map_err(soul_storage::StorageError::from)?;
    soul_storage::run_migrations(&pool)
        .await
        .map_err(soul_storage::StorageError::from)?;

    tracing::debug!("Database ready at {}", config.storage.database_url);
    Ok(LocalStorageContext::new(pool))
}
