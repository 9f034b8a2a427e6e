// src/audio/state.rs
//! Playback state owned by the controller and read by the view.

/// Transport, position and volume for the loaded track.
///
/// Fields are only mutated by [`PlaybackController`](super::controller::PlaybackController);
/// everything else reads through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    is_playing: bool,
    /// Seconds into the track, never negative and never past a known duration.
    current_time: f64,
    /// Seconds; `0.0` until the media reports it.
    duration: f64,
    /// Ratio in `[0, 1]`.
    volume: f64,
    /// Last non-zero volume, restored when unmuting.
    prev_volume: f64,
}

impl PlaybackState {
    pub fn new(volume: f64) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: clamp_unit(volume),
            prev_volume: 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Track length in seconds, `0.0` while unknown.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Volume on the `[0, 100]` slider scale.
    pub fn volume_percent(&self) -> f64 {
        self.volume * 100.0
    }

    pub fn prev_volume(&self) -> f64 {
        self.prev_volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume <= 0.0
    }

    /// Position as a percentage of the track, `0.0` while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.has_duration() {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// Seconds per progress percent. An unknown duration scales by `1.0`.
    pub fn progress_scale(&self) -> f64 {
        if self.has_duration() {
            self.duration / 100.0
        } else {
            1.0
        }
    }

    /// Clamp a position into the seekable range. Without a known duration only
    /// the lower bound applies.
    pub fn clamp_time(&self, t: f64) -> f64 {
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
        if self.has_duration() {
            t.min(self.duration)
        } else {
            t
        }
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub(crate) fn set_current_time(&mut self, t: f64) -> f64 {
        self.current_time = self.clamp_time(t);
        self.current_time
    }

    pub(crate) fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.current_time = self.clamp_time(self.current_time);
    }

    pub(crate) fn set_volume(&mut self, volume: f64) -> f64 {
        self.volume = clamp_unit(volume);
        self.volume
    }

    pub(crate) fn stash_volume(&mut self, volume: f64) {
        self.prev_volume = clamp_unit(volume);
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
