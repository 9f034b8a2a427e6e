// src/audio/metadata.rs
//! Track metadata extraction using Lofty.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey};

/// One metadata entry: display label & value.
pub type TagEntry = (String, String);

/// Descriptive metadata for the loaded track.
#[derive(Debug, Clone, Default)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Remaining text frames from the primary tag.
    pub tags: Vec<TagEntry>,
    /// Audio properties (bitrate, sample rate, channels).
    pub properties: Vec<TagEntry>,
    /// Total track length in seconds as reported by the container.
    pub duration_secs: f64,
}

impl TrackMetadata {
    /// `"Artist - Title"`, falling back to whichever part exists.
    pub fn headline(&self) -> Option<String> {
        match (&self.artist, &self.title) {
            (Some(artist), Some(title)) => Some(format!("{artist} - {title}")),
            (None, Some(title)) => Some(title.clone()),
            (Some(artist), None) => Some(artist.clone()),
            (None, None) => None,
        }
    }
}

/// Load metadata for a file path without touching player state.
/// This is safe to call from a background thread.
pub fn load_metadata(path: &Path) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(path)?.read()?;

    let mut meta = TrackMetadata::default();
    if let Some(tag) = tagged_file.primary_tag() {
        meta.title = tag.title().map(|s| s.into_owned());
        meta.artist = tag.artist().map(|s| s.into_owned());
        meta.album = tag.album().map(|s| s.into_owned());

        for item in tag.items() {
            if matches!(
                item.key(),
                ItemKey::TrackTitle | ItemKey::TrackArtist | ItemKey::AlbumTitle
            ) {
                continue;
            }
            if let Some(text) = item.value().text() {
                meta.tags.push((format!("{:?}", item.key()), text.to_string()));
            }
        }
    }

    let props = tagged_file.properties();
    if let Some(b) = props.audio_bitrate() {
        meta.properties.push(("Bitrate (kbps)".into(), b.to_string()));
    }
    if let Some(sr) = props.sample_rate() {
        meta.properties
            .push(("Sample Rate (Hz)".into(), sr.to_string()));
    }
    if let Some(ch) = props.channels() {
        meta.properties.push(("Channels".into(), ch.to_string()));
    }
    meta.duration_secs = props.duration().as_secs_f64();

    Ok(meta)
}

/// Container-reported duration, used when the decoder cannot tell up front.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged_file = Probe::open(path).ok()?.read().ok()?;
    let duration = tagged_file.properties().duration();
    (!duration.is_zero()).then_some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_prefers_artist_and_title() {
        let mut meta = TrackMetadata {
            title: Some("Night Drive".into()),
            ..TrackMetadata::default()
        };
        assert_eq!(meta.headline().as_deref(), Some("Night Drive"));

        meta.artist = Some("Lumen".into());
        assert_eq!(meta.headline().as_deref(), Some("Lumen - Night Drive"));

        meta.title = None;
        assert_eq!(meta.headline().as_deref(), Some("Lumen"));
    }

    #[test]
    fn unreadable_file_has_no_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();
        assert!(probe_duration(&path).is_none());
        assert!(load_metadata(&path).is_err());
    }
}
