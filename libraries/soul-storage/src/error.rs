/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid argument passed to a query
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for soul_core::SoulError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => soul_core::SoulError::not_found(entity, id),
            StorageError::InvalidInput(msg) => soul_core::SoulError::invalid_input(msg),
            StorageError::Database(e) => soul_core::SoulError::Database(e.to_string()),
            StorageError::Migration(e) => soul_core::SoulError::storage(e.to_string()),
        }
    }
}
