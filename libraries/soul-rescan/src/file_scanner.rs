//! Incremental file scanner
//!
//! Walks the catalog one composition at a time, re-reads tags from the
//! backing file, writes them back, and stamps the item as scanned.
//!
//! A pass computes its cutoff once from the state store:
//! - versions differ: cutoff is 0, every never-scanned item is revisited and
//!   the whole library is treated as stale
//! - versions match: cutoff is the last completion time
//!
//! Items are stamped after every attempt, successful or not, so a broken
//! file can never pin the pass. When the catalog runs dry the pass commits
//! `last_version` (from the snapshot taken at start) and the completion time.

use crate::{
    reporter::TracingErrorReporter, status::StatusChannel, RescanError, Result, ScannerConfig,
};
use serde::Serialize;
use soul_core::{
    types::{Composition, FileScannerState, ScanSnapshot, SourceTags, Timestamp},
    CompositionCatalog, ErrorReporter, SoulError, StateStore, TagReader,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Outcome of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Cutoff the pass selected candidates against
    pub cutoff: Timestamp,
    /// Whether a version mismatch forced a full rescan
    pub full_rescan: bool,
    /// Items dequeued and stamped
    pub scanned: u64,
    /// Items whose tags were written back
    pub updated: u64,
    /// Items whose file is gone
    pub missing: u64,
    /// Items deleted from the catalog mid-scan
    pub removed: u64,
    /// Items that failed every attempt
    pub failed: u64,
    pub duration: Duration,
}

impl PassSummary {
    fn new(snapshot: &ScanSnapshot) -> Self {
        Self {
            cutoff: snapshot.cutoff(),
            full_rescan: snapshot.is_full_rescan(),
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: ItemOutcome) {
        self.scanned += 1;
        match outcome {
            ItemOutcome::Updated => self.updated += 1,
            ItemOutcome::Missing => self.missing += 1,
            ItemOutcome::Removed => self.removed += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

/// A tag read that outlived its timeout and may still hold the file
type PendingRead<'a> = Pin<Box<dyn Future<Output = soul_core::Result<SourceTags>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Updated,
    Missing,
    Removed,
    Failed,
}

/// Background rescanner for the composition catalog
///
/// Cheap to clone; clones share the same gate and status channel.
#[derive(Clone)]
pub struct FileScanner {
    catalog: Arc<dyn CompositionCatalog>,
    state: Arc<dyn StateStore>,
    reader: Arc<dyn TagReader>,
    reporter: Arc<dyn ErrorReporter>,
    config: ScannerConfig,
    status: StatusChannel,
    /// True from the moment a start is accepted until the pass publishes Idle
    active: Arc<watch::Sender<bool>>,
    runtime: Handle,
}

impl FileScanner {
    /// Create a new file scanner
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; passes started with
    /// `schedule_start` are spawned onto that runtime.
    pub fn new(
        catalog: Arc<dyn CompositionCatalog>,
        state: Arc<dyn StateStore>,
        reader: Arc<dyn TagReader>,
    ) -> Self {
        let (active, _) = watch::channel(false);
        Self {
            catalog,
            state,
            reader,
            reporter: Arc::new(TracingErrorReporter),
            config: ScannerConfig::default(),
            status: StatusChannel::new(),
            active: Arc::new(active),
            runtime: Handle::current(),
        }
    }

    /// Set retry/timeout policy
    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set where exhausted failures are reported (default: `tracing`)
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Current scanner status
    pub fn status(&self) -> FileScannerState {
        self.status.current()
    }

    /// Subscribe to status changes. The receiver holds the current value.
    pub fn observe_status(&self) -> watch::Receiver<FileScannerState> {
        self.status.subscribe()
    }

    /// Status as a stream: current value first, then each distinct change
    pub fn status_stream(&self) -> WatchStream<FileScannerState> {
        self.status.stream()
    }

    /// Request a pass in the background
    ///
    /// Accepted only while the scanner is idle. Requests that arrive while a
    /// pass is running, or while an accepted start has not yet begun, are
    /// dropped. Returns whether this request started a pass.
    pub fn schedule_start(&self) -> bool {
        let Some(guard) = self.claim() else {
            tracing::debug!("File scanner busy, start request dropped");
            return false;
        };

        let scanner = self.clone();
        self.runtime.spawn(async move {
            let _guard = guard;
            if let Err(e) = scanner.execute_pass().await {
                tracing::error!("File scan pass aborted: {}", e);
                if let Some(cause) = e.cause() {
                    scanner.reporter.report(cause);
                }
            }
        });
        true
    }

    /// Run a pass on the calling task and wait for it
    ///
    /// Returns `Ok(None)` without doing anything if a pass is already active.
    pub async fn run_pass(&self) -> Result<Option<PassSummary>> {
        let Some(_guard) = self.claim() else {
            return Ok(None);
        };
        self.execute_pass().await.map(Some)
    }

    /// Wait until no pass is active
    pub async fn wait_until_idle(&self) {
        let mut active = self.active.subscribe();
        // Sender lives in self, so the channel cannot close here
        let _ = active.wait_for(|running| !*running).await;
    }

    fn claim(&self) -> Option<PassGuard> {
        let claimed = self.active.send_if_modified(|running| {
            if *running {
                false
            } else {
                *running = true;
                true
            }
        });
        claimed.then(|| PassGuard {
            active: Arc::clone(&self.active),
            status: self.status.clone(),
        })
    }

    async fn execute_pass(&self) -> Result<PassSummary> {
        self.config.validate()?;
        let started = Instant::now();

        let snapshot = self.state.snapshot().await.map_err(RescanError::State)?;
        let cutoff = snapshot.cutoff();
        if cutoff == Timestamp::MAX {
            // Nothing can be stamped past this; bumping the version resets it
            return Err(RescanError::State(SoulError::invalid_input(
                "last complete scan time is at the end of the timestamp range",
            )));
        }
        let mut summary = PassSummary::new(&snapshot);

        tracing::info!(
            "File scan started: cutoff={}, full_rescan={}, version {} (last complete {})",
            cutoff,
            summary.full_rescan,
            snapshot.current_version,
            snapshot.last_version
        );

        while let Some(composition) = self.next_candidate(cutoff).await? {
            self.status
                .publish(FileScannerState::Running(composition.clone()));

            let outcome = self.scan_composition(&composition).await;
            summary.record(outcome);

            // Strictly past the cutoff, or the same item comes straight back
            let scanned_at = now_millis().max(cutoff.saturating_add(1));
            self.catalog
                .set_last_file_scan_time(&composition, scanned_at)
                .await
                .map_err(|source| RescanError::Stamp {
                    id: composition.id,
                    source,
                })?;
        }

        self.complete_pass(&snapshot).await?;

        summary.duration = started.elapsed();
        tracing::info!(
            "File scan completed in {:?}: {} scanned, {} updated, {} missing, {} removed, {} failed",
            summary.duration,
            summary.scanned,
            summary.updated,
            summary.missing,
            summary.removed,
            summary.failed
        );

        Ok(summary)
    }

    /// Pull the next stale composition, retrying transient failures
    async fn next_candidate(&self, cutoff: Timestamp) -> Result<Option<Composition>> {
        let mut attempt = 1;
        loop {
            match self.catalog.select_next_candidate(cutoff).await {
                Ok(candidate) => return Ok(candidate),
                Err(e) if attempt < self.config.attempts() => {
                    tracing::warn!(
                        "Candidate selection failed (attempt {}/{}): {}",
                        attempt,
                        self.config.attempts(),
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(RescanError::Selection(e)),
            }
        }
    }

    /// Read and persist tags for one item. Never fails the pass.
    async fn scan_composition(&self, composition: &Composition) -> ItemOutcome {
        let attempts = self.config.attempts();
        let mut attempt = 1;
        let mut abandoned = None;

        loop {
            match self.read_and_update(composition, &mut abandoned).await {
                Ok(()) => {
                    tracing::debug!("Updated tags for {}", composition.display_name());
                    return ItemOutcome::Updated;
                }
                Err(e) if e.is_missing_file() => {
                    tracing::debug!(
                        "Source file missing for composition {}: {}",
                        composition.id,
                        composition.file_path
                    );
                    return ItemOutcome::Missing;
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!("Composition {} removed during scan", composition.id);
                    return ItemOutcome::Removed;
                }
                Err(e) if attempt < attempts => {
                    tracing::debug!(
                        "Scan of {} failed (attempt {}/{}): {}",
                        composition.file_path,
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Giving up on {} after {} attempts: {}",
                        composition.file_path,
                        attempts,
                        e
                    );
                    self.reporter.report(&e);
                    return ItemOutcome::Failed;
                }
            }
        }
    }

    /// One read + write-back attempt
    ///
    /// A read that times out is parked in `abandoned` instead of dropped:
    /// dropping it would not stop a blocking read already running on another
    /// thread. The next attempt waits (up to the same timeout) for the parked
    /// read to finish and only then opens the file again, so two reads of one
    /// file never overlap. If the parked read is still stuck the attempt
    /// counts as another timeout. Whatever is still parked when the item is
    /// given up is dropped with it.
    async fn read_and_update<'a>(
        &'a self,
        composition: &'a Composition,
        abandoned: &mut Option<PendingRead<'a>>,
    ) -> soul_core::Result<()> {
        let timeout = self.config.read_timeout();

        if let Some(previous) = abandoned.as_mut() {
            if tokio::time::timeout(timeout, previous).await.is_err() {
                return Err(SoulError::Timeout(timeout));
            }
            *abandoned = None;
        }

        let mut read = self.reader.read_tags(composition);
        let tags = match tokio::time::timeout(timeout, &mut read).await {
            Ok(result) => result?,
            Err(_) => {
                *abandoned = Some(read);
                return Err(SoulError::Timeout(timeout));
            }
        };

        self.catalog
            .update_composition_tags(composition, &tags)
            .await
    }

    async fn complete_pass(&self, snapshot: &ScanSnapshot) -> Result<()> {
        // Versions come from the start snapshot; a bump during the pass stays pending
        self.state
            .set_last_version(snapshot.current_version)
            .await
            .map_err(RescanError::State)?;
        self.state
            .set_last_complete_scan_time(now_millis())
            .await
            .map_err(RescanError::State)?;
        Ok(())
    }
}

impl std::fmt::Debug for FileScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileScanner")
            .field("config", &self.config)
            .field("status", &self.status.current())
            .field("active", &*self.active.borrow())
            .finish()
    }
}

/// Held for the lifetime of a pass. Dropping it returns the scanner to
/// `Idle`, also when the pass errors out or its task panics.
struct PassGuard {
    active: Arc<watch::Sender<bool>>,
    status: StatusChannel,
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        // Idle is published under the gate so no start can slip in between
        self.active.send_modify(|running| {
            self.status.publish(FileScannerState::Idle);
            *running = false;
        });
    }
}

fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
