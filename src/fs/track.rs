// src/fs/track.rs
//! The track locator handed to the player.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::detection::{FileCategory, detect_file_type};

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track not found: {0}")]
    NotFound(PathBuf),

    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    #[error("{path} looks like {category} ({mime}), not audio")]
    NotAudio {
        path: PathBuf,
        category: FileCategory,
        mime: String,
    },

    #[error("cannot inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An audio file on disk. Fixed for the lifetime of a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    path: PathBuf,
    mime: String,
}

impl Track {
    /// Resolve `path` and check that it is an audio file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => TrackError::NotFound(path.to_path_buf()),
            _ => TrackError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if !meta.is_file() {
            return Err(TrackError::NotAFile(path.to_path_buf()));
        }

        let detected = detect_file_type(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if detected.category != FileCategory::Audio {
            return Err(TrackError::NotAudio {
                path: path.to_path_buf(),
                category: detected.category,
                mime: detected.mime,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            mime: detected.mime,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// File name for titles when the track carries no tags.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
