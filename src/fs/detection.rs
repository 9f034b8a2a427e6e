// src/fs/detection.rs
//! File type detection using magic numbers and extension-based fallback.

use std::{fmt, io, path::Path};

use infer::{Infer, MatcherType};
use mime_guess::MimeGuess;

/// High-level file categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileCategory {
    Image,
    Audio,
    Video,
    Document,
    Binary,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileCategory::Image => "image",
            FileCategory::Audio => "audio",
            FileCategory::Video => "video",
            FileCategory::Document => "a document",
            FileCategory::Binary => "binary data",
        };
        write!(f, "{}", s)
    }
}

/// Holds a detected MIME type + category.
#[derive(Debug)]
pub struct FileType {
    pub mime: String,
    pub category: FileCategory,
}

/// Detect MIME type & category for a given file path.
pub fn detect_file_type(path: &Path) -> io::Result<FileType> {
    // Magic numbers win over the extension
    if let Some(kind) = Infer::new().get_from_path(path)? {
        let mime = kind.mime_type().to_string();
        let category = match kind.matcher_type() {
            MatcherType::Image => FileCategory::Image,
            MatcherType::Audio => FileCategory::Audio,
            MatcherType::Video => FileCategory::Video,
            _ => FileCategory::Binary,
        };
        return Ok(FileType { mime, category });
    }

    let mime = MimeGuess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let category = match mime.split('/').next().unwrap_or("application") {
        "image" => FileCategory::Image,
        "audio" => FileCategory::Audio,
        "video" => FileCategory::Video,
        "text" => FileCategory::Document,
        "application" => FileCategory::Document,
        _ => FileCategory::Binary,
    };

    Ok(FileType { mime, category })
}
