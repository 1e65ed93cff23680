//! Composition types
//!
//! A composition is one library entry backed by a file on storage. The
//! scanner only touches its tag columns and its `last_file_scan_time`
//! watermark; everything else belongs to the catalog.

use super::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type CompositionId = i64;

/// A persisted library entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub id: CompositionId,

    /// Storage locator of the backing file
    pub file_path: String,

    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<i32>,
    pub disc_number: Option<i32>,
    pub duration_ms: Option<i64>,

    /// When the file was last scanned (0 = never)
    pub last_file_scan_time: Timestamp,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Composition {
    pub fn path(&self) -> &Path {
        Path::new(&self.file_path)
    }

    /// Title for log lines, falling back to the file name
    pub fn display_name(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.file_path.clone())
        })
    }
}

/// Data for registering a new composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComposition {
    pub file_path: String,
    pub title: Option<String>,
}

impl NewComposition {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            title: None,
        }
    }
}

/// Metadata read from a composition's source file
///
/// Not persisted on its own; only used to update the matching row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<i32>,
    pub disc_number: Option<i32>,
    pub duration_ms: Option<i64>,
}

impl SourceTags {
    pub fn new() -> Self {
        Self::default()
    }
}
