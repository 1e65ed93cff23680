/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Library error: {0}")]
    Library(#[from] soul_core::SoulError),

    #[error("Scan error: {0}")]
    Scan(#[from] soul_rescan::RescanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] soul_metadata::MetadataError),

    #[error("Database error: {0}")]
    Database(#[from] soul_storage::StorageError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
