//! Soul Rescan Engine
//!
//! Keeps library metadata in step with the files on storage by re-reading
//! tags one composition at a time.
//!
//! # Features
//!
//! - Incremental passes driven by a durable scan cutoff
//! - Full rescans whenever the library version moves
//! - Per-item retry with a bounded tag-read timeout
//! - At most one active pass; extra start requests are dropped
//! - Distinct-value status stream for observers
//!
//! # Architecture
//!
//! - `file_scanner`: the pass loop and its start gate
//! - `status`: latest-value broadcast of `FileScannerState`
//! - `config`: retry and timeout settings
//! - `reporter`: default error reporter backed by `tracing`
//!
//! # Example
//!
//! ```rust,no_run
//! use soul_rescan::{FileScanner, ScannerConfig};
//! use soul_core::{CompositionCatalog, StateStore, TagReader};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     catalog: Arc<dyn CompositionCatalog>,
//! #     state: Arc<dyn StateStore>,
//! #     reader: Arc<dyn TagReader>,
//! # ) {
//! let scanner = FileScanner::new(catalog, state, reader).with_config(ScannerConfig::default());
//!
//! let mut status = scanner.observe_status();
//! scanner.schedule_start();
//! scanner.wait_until_idle().await;
//! println!("{:?}", *status.borrow_and_update());
//! # }
//! ```

mod error;

pub mod config;
pub mod file_scanner;
pub mod reporter;
pub mod status;

pub use config::ScannerConfig;
pub use error::RescanError;
pub use file_scanner::{FileScanner, PassSummary};
pub use reporter::TracingErrorReporter;
pub use status::StatusChannel;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, RescanError>;
