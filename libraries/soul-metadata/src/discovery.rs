//! Audio file discovery

use crate::{MetadataError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported audio file extensions
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a", "opus"];

/// Check if a file is a supported audio file
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect audio files under `path`, or `path` itself if it is one
///
/// Results are sorted so registration order is stable.
pub fn find_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.display().to_string()));
    }

    if path.is_file() {
        if is_audio_file(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(MetadataError::InvalidPath(format!(
            "{} is not a supported audio file",
            path.display()
        )));
    }

    let mut audio_files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    audio_files.sort();
    Ok(audio_files)
}
