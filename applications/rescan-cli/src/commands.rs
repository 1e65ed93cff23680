//! Command implementations, one per subcommand

use crate::{AppConfig, Result};
use serde::Serialize;
use soul_core::types::{
    Composition, CompositionId, FileScannerState, NewComposition, ScanVersion, Timestamp,
};
use soul_core::StateStore;
use soul_metadata::LoftyTagReader;
use soul_rescan::{FileScanner, PassSummary};
use soul_storage::LocalStorageContext;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_stream::StreamExt;

/// Persisted scanner state as printed by `state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateReport {
    pub current_version: ScanVersion,
    pub last_version: ScanVersion,
    pub last_complete_scan_time: Timestamp,
    pub full_rescan_pending: bool,
    pub compositions: usize,
}

/// Result of `scan`
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// `None` when another pass was already running
    pub summary: Option<PassSummary>,
    /// Last status the log watcher saw before the channel closed
    pub final_status: Option<FileScannerState>,
}

/// Run one pass in the foreground, logging each status change
pub async fn scan(ctx: &LocalStorageContext, config: &AppConfig) -> Result<ScanOutcome> {
    let shared = Arc::new(ctx.clone());
    let scanner = FileScanner::new(shared.clone(), shared, Arc::new(LoftyTagReader::new()))
        .with_config(config.scanner.clone());

    let mut status = scanner.status_stream();
    let watcher = tokio::spawn(async move {
        let mut last = None;
        while let Some(state) = status.next().await {
            match state.composition() {
                Some(composition) => {
                    tracing::info!("Scanning {}", composition.file_path);
                }
                None => tracing::info!("Scanner idle"),
            }
            last = Some(state);
        }
        last
    });

    let result = scanner.run_pass().await;

    // Dropping the scanner closes the status channel; the watcher still
    // receives the final Idle before its stream ends
    drop(scanner);
    let final_status = match watcher.await {
        Ok(last) => last,
        Err(e) => {
            tracing::warn!("Status watcher failed: {}", e);
            None
        }
    };

    Ok(ScanOutcome {
        summary: result?,
        final_status,
    })
}

/// Result of `add`
#[derive(Debug, Clone, Default)]
pub struct AddOutcome {
    pub added: Vec<Composition>,
    /// Files that were already in the catalog
    pub skipped: Vec<PathBuf>,
}

/// Register audio files; directories are searched recursively
///
/// Paths already in the catalog, or repeated in `paths`, are skipped.
pub async fn add(ctx: &LocalStorageContext, paths: &[PathBuf]) -> Result<AddOutcome> {
    let mut known: HashSet<String> = ctx
        .get_all_compositions()
        .await?
        .into_iter()
        .map(|c| c.file_path)
        .collect();
    let mut outcome = AddOutcome::default();

    for path in paths {
        for file in soul_metadata::find_audio_files(path)? {
            let file = std::fs::canonicalize(&file).unwrap_or(file);
            let file_path = file.display().to_string();

            if !known.insert(file_path.clone()) {
                tracing::warn!("Already registered, skipping: {}", file_path);
                outcome.skipped.push(file);
                continue;
            }

            let composition = ctx.add_composition(NewComposition::new(file_path)).await?;
            tracing::info!("Added composition {}: {}", composition.id, composition.file_path);
            outcome.added.push(composition);
        }
    }

    Ok(outcome)
}

pub async fn remove(ctx: &LocalStorageContext, id: CompositionId) -> Result<()> {
    ctx.remove_composition(id).await?;
    tracing::info!("Removed composition {}", id);
    Ok(())
}

/// Force the next pass to be a full rescan
pub async fn bump_version(ctx: &LocalStorageContext) -> Result<ScanVersion> {
    Ok(ctx.bump_current_version().await?)
}

pub async fn state(ctx: &LocalStorageContext) -> Result<StateReport> {
    let snapshot = ctx.snapshot().await?;
    let compositions = ctx.get_all_compositions().await?.len();

    Ok(StateReport {
        current_version: snapshot.current_version,
        last_version: snapshot.last_version,
        last_complete_scan_time: snapshot.last_complete_scan_time,
        full_rescan_pending: snapshot.is_full_rescan(),
        compositions,
    })
}
