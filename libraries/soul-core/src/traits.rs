//! Collaborator traits for the file scanner
//!
//! The scanner owns none of its I/O. Persistence, tag decoding, and error
//! reporting are injected through these traits so the pass logic can be
//! driven against `SQLite` in production and in-memory fakes in tests.

use crate::error::Result;
use crate::types::{Composition, ScanSnapshot, ScanVersion, SourceTags, Timestamp};
use async_trait::async_trait;

/// Durable scanner bookkeeping
///
/// Pure accessors. Failures propagate to the caller, which treats them as
/// fatal for the current pass.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current library generation
    async fn current_version(&self) -> Result<ScanVersion>;

    async fn set_current_version(&self, version: ScanVersion) -> Result<()>;

    /// Library generation covered by the last completed pass
    async fn last_version(&self) -> Result<ScanVersion>;

    async fn set_last_version(&self, version: ScanVersion) -> Result<()>;

    /// When the last completed pass finished (0 = never)
    async fn last_complete_scan_time(&self) -> Result<Timestamp>;

    async fn set_last_complete_scan_time(&self, time: Timestamp) -> Result<()>;

    /// Read all three values in one go
    async fn snapshot(&self) -> Result<ScanSnapshot> {
        Ok(ScanSnapshot {
            current_version: self.current_version().await?,
            last_version: self.last_version().await?,
            last_complete_scan_time: self.last_complete_scan_time().await?,
        })
    }
}

/// Query interface over the persisted library
#[async_trait]
pub trait CompositionCatalog: Send + Sync {
    /// Next composition whose `last_file_scan_time` is at or before `cutoff`
    ///
    /// Ordering is deterministic: oldest scan time first, then by id.
    /// Returns `None` once nothing remains below the cutoff.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a negative cutoff
    async fn select_next_candidate(&self, cutoff: Timestamp) -> Result<Option<Composition>>;

    /// Write tags read from the source file onto the matching row
    ///
    /// # Errors
    /// Returns `NotFound` when the composition was deleted concurrently
    async fn update_composition_tags(
        &self,
        composition: &Composition,
        tags: &SourceTags,
    ) -> Result<()>;

    /// Advance the per-item scan watermark
    async fn set_last_file_scan_time(
        &self,
        composition: &Composition,
        scanned_at: Timestamp,
    ) -> Result<()>;
}

/// Reads authoritative metadata from a composition's backing file
#[async_trait]
pub trait TagReader: Send + Sync {
    /// # Errors
    /// - `FileNotFound` when the file is missing
    /// - `Metadata` or `Io` for anything else
    async fn read_tags(&self, composition: &Composition) -> Result<SourceTags>;
}

/// Sink for non-fatal errors that survived all retries
///
/// Fire-and-forget: implementations must not panic.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &crate::SoulError);
}
