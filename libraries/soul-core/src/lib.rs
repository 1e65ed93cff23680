//! Soul Rescan Core
//!
//! Platform-agnostic types, collaborator traits, and error handling for the
//! incremental library rescanner.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Composition`, `SourceTags`, `FileScannerState`, `ScanSnapshot`
//! - **Collaborator Traits**: `StateStore`, `CompositionCatalog`, `TagReader`, `ErrorReporter`
//! - **Error Handling**: Unified `SoulError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use soul_core::types::{FileScannerState, ScanSnapshot};
//!
//! // Versions match: only items scanned before the last completion are stale
//! let snapshot = ScanSnapshot {
//!     current_version: 5,
//!     last_version: 5,
//!     last_complete_scan_time: 1_700_000_000_000,
//! };
//! assert_eq!(snapshot.cutoff(), 1_700_000_000_000);
//!
//! assert!(FileScannerState::Idle.is_idle());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SoulError};
pub use traits::{CompositionCatalog, ErrorReporter, StateStore, TagReader};

pub use types::{
    Composition, CompositionId, FileScannerState, NewComposition, ScanSnapshot, ScanVersion,
    SourceTags, Timestamp,
};
