// src/audio/media/mod.rs
//! The media element: transport, position, volume and native playback events.

mod rodio_media;

#[cfg(test)]
pub mod fake;

use thiserror::Error;

use super::graph::SignalTap;

pub use rodio_media::RodioMedia;

/// Notifications a media element raises from its own playback clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Duration became known.
    LoadedMetadata { duration: f64 },
    /// Position changed, either from playback or after a seek.
    TimeUpdate { current_time: f64 },
    /// Playback reached the end of the track.
    Ended,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media element already has an audio tap attached")]
    AlreadyTapped,

    #[error("no audio output device available")]
    NoOutput,

    #[error("media element has shut down")]
    Closed,
}

/// Playback element bound to a single track.
///
/// Positions are seconds and volume is a ratio in `[0, 1]`. Writes take effect
/// immediately from the caller's point of view; the element confirms them by
/// raising [`MediaEvent::TimeUpdate`] later.
pub trait MediaElement {
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, t: f64);

    /// `None` until the metadata has loaded.
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn paused(&self) -> bool;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Next pending native event, if any.
    fn poll_event(&mut self) -> Option<MediaEvent>;

    /// Route this element's output through `tap`. An element accepts one tap
    /// for its whole lifetime.
    fn attach_tap(&mut self, tap: SignalTap) -> Result<(), MediaError>;

    fn is_tapped(&self) -> bool;
}
