// src/player/mod.rs
//! Player variants composed by the host: with or without the spectrum.

mod basic;
mod spectrum;

use std::time::Instant;

use ratatui::{Frame, layout::Rect};

use crate::audio::graph::AnalyserSettings;
use crate::audio::visualizer::BarLayout;
use crate::audio::{MediaElement, PlaybackController, PlaybackState};
use crate::config::Config;

pub use basic::BasicPlayer;
pub use spectrum::SpectrumPlayer;

/// User gestures translated into playback commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    TogglePlay,
    SkipBack,
    SkipForward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    /// Click or drag on the seek gauge, as a fraction of its width.
    SeekToFraction(f64),
    /// Click or drag on the volume gauge, as a fraction of its width.
    VolumeToFraction(f64),
}

/// Tunables shared by every variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    pub initial_volume: f64,
    pub skip_seconds: f64,
    pub volume_step: f64,
    pub analyser: AnalyserSettings,
    pub bars: BarLayout,
    pub frame_rate: u32,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            skip_seconds: 15.0,
            volume_step: 0.05,
            analyser: AnalyserSettings::default(),
            bars: BarLayout::default(),
            frame_rate: 60,
        }
    }
}

impl From<&Config> for PlayerOptions {
    fn from(config: &Config) -> Self {
        Self {
            initial_volume: config.player.initial_volume,
            skip_seconds: config.player.skip_seconds,
            volume_step: config.player.volume_step,
            analyser: AnalyserSettings {
                fft_size: config.analyser.fft_size,
                smoothing: config.analyser.smoothing,
            },
            bars: BarLayout {
                bar_count: config.spectrum.bar_count,
                bar_gap: config.spectrum.bar_gap,
                spectrum_range: config.spectrum.spectrum_range,
            },
            frame_rate: config.spectrum.frame_rate,
        }
    }
}

/// The playback-control capability every player variant offers the host.
pub trait PlayerWidget {
    fn handle_action(&mut self, action: PlayerAction);

    /// Drain native media events into state. Returns how many were handled.
    fn pump_media_events(&mut self) -> usize;

    /// Run any display-frame work due at `now`.
    fn tick(&mut self, now: Instant);

    /// When [`tick`](Self::tick) next has work, if ever.
    fn next_deadline(&self) -> Option<Instant>;

    fn state(&self) -> &PlaybackState;

    fn has_spectrum(&self) -> bool;

    fn render_spectrum(&mut self, f: &mut Frame<'_>, area: Rect);

    /// Stop playback and release audio resources.
    fn teardown(&mut self);
}

/// Everything but play/pause behaves the same in every variant.
fn apply_transport_action<M: MediaElement>(
    controller: &mut PlaybackController<M>,
    options: &PlayerOptions,
    action: PlayerAction,
) {
    match action {
        PlayerAction::TogglePlay => {}
        PlayerAction::SkipBack => controller.skip(-options.skip_seconds),
        PlayerAction::SkipForward => controller.skip(options.skip_seconds),
        PlayerAction::VolumeUp => {
            controller.set_volume(controller.state().volume() + options.volume_step)
        }
        PlayerAction::VolumeDown => {
            controller.set_volume(controller.state().volume() - options.volume_step)
        }
        PlayerAction::ToggleMute => controller.toggle_mute(),
        PlayerAction::SeekToFraction(f) => controller.seek_by_progress(f * 100.0),
        PlayerAction::VolumeToFraction(f) => controller.set_volume_by_percent(f * 100.0),
    }
}
