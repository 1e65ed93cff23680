//! Soul Rescan Metadata
//!
//! Tag reading for the incremental file scanner.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, AAC, OPUS) via lofty
//! - Audio file discovery for registering new compositions
//!
//! # Example
//!
//! ```rust,no_run
//! use soul_metadata::LoftyTagReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = LoftyTagReader::new();
//! let tags = reader.read_path(Path::new("/music/song.mp3"))?;
//! println!("{:?} - {:?}", tags.artist, tags.title);
//! # Ok(())
//! # }
//! ```

mod discovery;
mod error;
mod reader;

pub use discovery::{find_audio_files, is_audio_file};
pub use error::{MetadataError, Result};
pub use reader::LoftyTagReader;
