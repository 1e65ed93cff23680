/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use lofty::{AudioFile, TaggedFileExt};
use soul_core::types::{Composition, SourceTags};
use soul_core::TagReader;
use std::path::Path;

/// Tag reader using the lofty library
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self
    }

    /// Read tags synchronously. Blocks on file I/O.
    pub fn read_path(&self, path: &Path) -> Result<SourceTags> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(MetadataError::InvalidPath(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let tagged_file = lofty::read_from_path(path)?;

        let duration_ms = Some(tagged_file.properties().duration().as_millis() as i64);

        // Primary tag first, then whatever else the container carries
        let mut tags = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first())
            .map(Self::extract_from_tag)
            .unwrap_or_default();
        tags.duration_ms = duration_ms;

        Ok(tags)
    }

    /// Extract tags from a lofty tag
    fn extract_from_tag(tag: &lofty::Tag) -> SourceTags {
        let mut tags = SourceTags::new();

        // lofty 0.18 API - iterate through items
        for item in tag.items() {
            let Some(text) = item.value().text() else {
                continue;
            };
            match item.key() {
                lofty::ItemKey::TrackTitle => tags.title = non_empty(text),
                lofty::ItemKey::TrackArtist => tags.artist = non_empty(text),
                lofty::ItemKey::AlbumTitle => tags.album = non_empty(text),
                lofty::ItemKey::AlbumArtist => tags.album_artist = non_empty(text),
                lofty::ItemKey::Genre => tags.genre = non_empty(text),
                lofty::ItemKey::Year | lofty::ItemKey::RecordingDate => {
                    if tags.year.is_none() {
                        tags.year = parse_year(text);
                    }
                }
                lofty::ItemKey::TrackNumber => tags.track_number = parse_position(text),
                lofty::ItemKey::DiscNumber => tags.disc_number = parse_position(text),
                _ => {}
            }
        }

        tags
    }
}

#[async_trait]
impl TagReader for LoftyTagReader {
    async fn read_tags(&self, composition: &Composition) -> soul_core::Result<SourceTags> {
        let reader = *self;
        let path = composition.path().to_path_buf();

        // lofty is synchronous; keep it off the scan loop's thread
        let tags = tokio::task::spawn_blocking(move || reader.read_path(&path))
            .await
            .map_err(|e| MetadataError::Task(e.to_string()))??;

        Ok(tags)
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// "2004", "2004-05-01"
fn parse_year(text: &str) -> Option<i32> {
    text.trim().get(..4)?.parse().ok()
}

/// "3", "3/12"
fn parse_position(text: &str) -> Option<i32> {
    text.split('/').next()?.trim().parse().ok()
}
