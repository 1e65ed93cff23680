//! In-memory collaborators for driving the file scanner in tests

#![allow(dead_code)]

use async_trait::async_trait;
use soul_core::types::{Composition, ScanSnapshot, ScanVersion, SourceTags, Timestamp};
use soul_core::{CompositionCatalog, ErrorReporter, SoulError, StateStore, TagReader};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;
use tokio::sync::Semaphore;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn composition(id: i64, last_file_scan_time: Timestamp) -> Composition {
    Composition {
        id,
        file_path: format!("/music/track_{id:02}.flac"),
        title: None,
        artist: None,
        album: None,
        album_artist: None,
        genre: None,
        year: None,
        track_number: None,
        disc_number: None,
        duration_ms: None,
        last_file_scan_time,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn tags(title: &str) -> SourceTags {
    SourceTags {
        title: Some(title.to_string()),
        artist: Some("Test Artist".to_string()),
        ..SourceTags::default()
    }
}

/// Write a silent 16-bit mono PCM WAV of the given length
pub fn write_silent_wav(path: &Path, millis: u32) -> std::io::Result<()> {
    let sample_rate = 8000u32;
    let block_align = 2u16;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = byte_rate * millis / 1000;

    let mut file = std::fs::File::create(path)?;
    file.write_all(b"RIFF")?;
    file.write_all(&(36 + data_size).to_le_bytes())?;
    file.write_all(b"WAVE")?;
    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&1u16.to_le_bytes())?; // mono
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&byte_rate.to_le_bytes())?;
    file.write_all(&block_align.to_le_bytes())?;
    file.write_all(&16u16.to_le_bytes())?;
    file.write_all(b"data")?;
    file.write_all(&data_size.to_le_bytes())?;
    file.write_all(&vec![0u8; data_size as usize])?;
    Ok(())
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Default)]
pub struct MemoryCatalog {
    rows: Mutex<BTreeMap<i64, Composition>>,
    pub select_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub stamp_calls: AtomicUsize,
    /// Composition ids in the order they were returned by selection
    pub selected: Mutex<Vec<i64>>,
    /// (id, scanned_at) for every stamp
    pub stamps: Mutex<Vec<(i64, Timestamp)>>,
    /// Remaining selection calls that fail before succeeding
    pub failing_selects: AtomicUsize,
    /// Remaining update calls that fail
    pub failing_updates: AtomicUsize,
    pub fail_stamps: AtomicBool,
    /// Ids deleted from the catalog right after they are selected
    pub delete_on_select: Mutex<Vec<i64>>,
}

impl MemoryCatalog {
    pub fn with(compositions: impl IntoIterator<Item = Composition>) -> Self {
        let catalog = Self::default();
        {
            let mut rows = catalog.rows.lock().unwrap();
            for composition in compositions {
                rows.insert(composition.id, composition);
            }
        }
        catalog
    }

    pub fn get(&self, id: i64) -> Option<Composition> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn selected(&self) -> Vec<i64> {
        self.selected.lock().unwrap().clone()
    }

    pub fn stamps(&self) -> Vec<(i64, Timestamp)> {
        self.stamps.lock().unwrap().clone()
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn stamp_calls(&self) -> usize {
        self.stamp_calls.load(Ordering::SeqCst)
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl CompositionCatalog for MemoryCatalog {
    async fn select_next_candidate(
        &self,
        cutoff: Timestamp,
    ) -> soul_core::Result<Option<Composition>> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.failing_selects) {
            return Err(SoulError::Database("database is locked".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        let next = rows
            .values()
            .filter(|c| c.last_file_scan_time <= cutoff)
            .min_by_key(|c| (c.last_file_scan_time, c.id))
            .cloned();

        if let Some(ref c) = next {
            self.selected.lock().unwrap().push(c.id);
            if self.delete_on_select.lock().unwrap().contains(&c.id) {
                rows.remove(&c.id);
            }
        }
        Ok(next)
    }

    async fn update_composition_tags(
        &self,
        composition: &Composition,
        tags: &SourceTags,
    ) -> soul_core::Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.failing_updates) {
            return Err(SoulError::Database("disk I/O error".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&composition.id)
            .ok_or_else(|| SoulError::not_found("Composition", composition.id.to_string()))?;
        if tags.title.is_some() {
            row.title = tags.title.clone();
        }
        row.artist = tags.artist.clone();
        row.album = tags.album.clone();
        Ok(())
    }

    async fn set_last_file_scan_time(
        &self,
        composition: &Composition,
        scanned_at: Timestamp,
    ) -> soul_core::Result<()> {
        self.stamp_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stamps.load(Ordering::SeqCst) {
            return Err(SoulError::Database("database is read-only".to_string()));
        }

        self.stamps.lock().unwrap().push((composition.id, scanned_at));
        if let Some(row) = self.rows.lock().unwrap().get_mut(&composition.id) {
            row.last_file_scan_time = scanned_at;
        }
        Ok(())
    }
}

// ============================================================================
// State store
// ============================================================================

pub struct MemoryStateStore {
    snapshot: Mutex<ScanSnapshot>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MemoryStateStore {
    pub fn new(
        current_version: ScanVersion,
        last_version: ScanVersion,
        last_complete: Timestamp,
    ) -> Self {
        Self {
            snapshot: Mutex::new(ScanSnapshot {
                current_version,
                last_version,
                last_complete_scan_time: last_complete,
            }),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn get(&self) -> ScanSnapshot {
        *self.snapshot.lock().unwrap()
    }

    pub fn bump(&self) {
        self.snapshot.lock().unwrap().current_version += 1;
    }

    fn read_check(&self) -> soul_core::Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SoulError::storage("state store unavailable"));
        }
        Ok(())
    }

    fn write_check(&self) -> soul_core::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SoulError::storage("state store is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn current_version(&self) -> soul_core::Result<ScanVersion> {
        self.read_check()?;
        Ok(self.get().current_version)
    }

    async fn set_current_version(&self, version: ScanVersion) -> soul_core::Result<()> {
        self.write_check()?;
        self.snapshot.lock().unwrap().current_version = version;
        Ok(())
    }

    async fn last_version(&self) -> soul_core::Result<ScanVersion> {
        self.read_check()?;
        Ok(self.get().last_version)
    }

    async fn set_last_version(&self, version: ScanVersion) -> soul_core::Result<()> {
        self.write_check()?;
        self.snapshot.lock().unwrap().last_version = version;
        Ok(())
    }

    async fn last_complete_scan_time(&self) -> soul_core::Result<Timestamp> {
        self.read_check()?;
        Ok(self.get().last_complete_scan_time)
    }

    async fn set_last_complete_scan_time(&self, time: Timestamp) -> soul_core::Result<()> {
        self.write_check()?;
        self.snapshot.lock().unwrap().last_complete_scan_time = time;
        Ok(())
    }
}

// ============================================================================
// Tag reader
// ============================================================================

/// Scripted failure for one read attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStep {
    Ok,
    Missing,
    IoError,
    /// Sleep past any sane timeout
    Hang,
    /// Finish after 3s: past the default timeout, inside the next attempt
    Slow,
}

/// Reader that plays back a per-composition script, then succeeds
#[derive(Default)]
pub struct ScriptedReader {
    scripts: Mutex<HashMap<i64, Vec<ReadStep>>>,
    pub calls: Mutex<HashMap<i64, usize>>,
    /// When set, every read waits for a permit first
    pub gate: Option<Semaphore>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Counts a read as in flight until it completes or is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads block until `release` is called
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn script(self, id: i64, steps: &[ReadStep]) -> Self {
        self.scripts.lock().unwrap().insert(id, steps.to_vec());
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls_for(&self, id: i64) -> usize {
        self.calls.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Most reads that were ever running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagReader for ScriptedReader {
    async fn read_tags(&self, composition: &Composition) -> soul_core::Result<SourceTags> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        let step = {
            *self.calls.lock().unwrap().entry(composition.id).or_insert(0) += 1;
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&composition.id) {
                Some(steps) if !steps.is_empty() => steps.remove(0),
                _ => ReadStep::Ok,
            }
        };

        match step {
            ReadStep::Ok => Ok(tags(&format!("Title {}", composition.id))),
            ReadStep::Missing => Err(SoulError::file_not_found(composition.file_path.clone())),
            ReadStep::IoError => Err(SoulError::metadata("unexpected end of stream")),
            ReadStep::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(tags("too late"))
            }
            ReadStep::Slow => {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Ok(tags("late"))
            }
        }
    }
}

// ============================================================================
// Error reporter
// ============================================================================

#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &SoulError) {
        self.reports.lock().unwrap().push(error.to_string());
    }
}
