/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Path exists but is not usable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Tag parsing error
    #[error("Tag parsing error: {0}")]
    ParseError(String),

    /// Blocking read task died before returning
    #[error("Tag read task failed: {0}")]
    Task(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<lofty::error::LoftyError> for MetadataError {
    fn from(err: lofty::error::LoftyError) -> Self {
        match err.kind() {
            lofty::error::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                Self::FileNotFound(io.to_string())
            }
            _ => Self::ParseError(err.to_string()),
        }
    }
}

impl From<MetadataError> for soul_core::SoulError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => soul_core::SoulError::file_not_found(path),
            MetadataError::Io(e) => soul_core::SoulError::Io(e),
            other => soul_core::SoulError::metadata(other.to_string()),
        }
    }
}
