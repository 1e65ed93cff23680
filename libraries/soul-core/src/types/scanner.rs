//! File scanner state types

use super::{Composition, Timestamp};
use serde::{Deserialize, Serialize};

/// Library generation counter
///
/// Bumped whenever the set of compositions changes structurally.
pub type ScanVersion = i64;

/// Current status of the file scanner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "composition", rename_all = "lowercase")]
pub enum FileScannerState {
    /// No pass in progress
    #[default]
    Idle,
    /// Currently scanning the given composition
    Running(Composition),
}

impl FileScannerState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The composition being scanned, if any
    pub fn composition(&self) -> Option<&Composition> {
        match self {
            Self::Idle => None,
            Self::Running(composition) => Some(composition),
        }
    }
}

/// Scanner state as read from the state store at the start of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub current_version: ScanVersion,
    pub last_version: ScanVersion,
    pub last_complete_scan_time: Timestamp,
}

impl ScanSnapshot {
    /// A version bump since the last completed pass forces a full rescan
    #[must_use]
    pub fn is_full_rescan(&self) -> bool {
        self.last_version != self.current_version
    }

    /// Items whose scan time is at or before this are candidates
    #[must_use]
    pub fn cutoff(&self) -> Timestamp {
        if self.is_full_rescan() {
            0
        } else {
            self.last_complete_scan_time
        }
    }
}
