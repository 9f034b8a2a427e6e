// src/fs/mod.rs
//! Filesystem module - resolves and validates the track to play.

pub mod detection;
pub mod track;

// Re-export commonly used types
pub use detection::{FileCategory, FileType, detect_file_type};
pub use track::{Track, TrackError};
