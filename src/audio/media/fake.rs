// src/audio/media/fake.rs
//! In-memory media element used by the tests.

use std::collections::VecDeque;

use super::{MediaElement, MediaError, MediaEvent};
use crate::audio::graph::SignalTap;

/// Media element that behaves like a browser one without producing audio:
/// seeks are clamped and echoed back as time updates.
#[derive(Debug, Default)]
pub struct FakeMedia {
    current_time: f64,
    duration: Option<f64>,
    volume: f64,
    paused: bool,
    events: VecDeque<MediaEvent>,
    tap: Option<SignalTap>,
    tap_attempts: usize,
    play_calls: usize,
    fail_play: bool,
}

impl FakeMedia {
    /// A paused element whose metadata is already queued when `duration` is set.
    pub fn new(duration: Option<f64>) -> Self {
        let mut media = Self {
            volume: 1.0,
            paused: true,
            ..Self::default()
        };
        if let Some(d) = duration {
            media.load_metadata(d);
        }
        media
    }

    pub fn failing_play(mut self) -> Self {
        self.fail_play = true;
        self
    }

    pub fn load_metadata(&mut self, duration: f64) {
        self.duration = Some(duration);
        self.events
            .push_back(MediaEvent::LoadedMetadata { duration });
    }

    /// Advance the playback clock as if `dt` seconds had played.
    pub fn advance(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        let end = self.duration.unwrap_or(f64::MAX);
        self.current_time = (self.current_time + dt).min(end);
        self.events.push_back(MediaEvent::TimeUpdate {
            current_time: self.current_time,
        });
        if self.current_time >= end {
            self.finish();
        }
    }

    pub fn finish(&mut self) {
        if let Some(d) = self.duration {
            self.current_time = d;
        }
        self.paused = true;
        self.events.push_back(MediaEvent::Ended);
    }

    pub fn tap(&self) -> Option<&SignalTap> {
        self.tap.as_ref()
    }

    pub fn tap_attempts(&self) -> usize {
        self.tap_attempts
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls
    }
}

impl MediaElement for FakeMedia {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, t: f64) {
        let upper = self.duration.unwrap_or(f64::MAX);
        self.current_time = t.clamp(0.0, upper);
        self.events.push_back(MediaEvent::TimeUpdate {
            current_time: self.current_time,
        });
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.play_calls += 1;
        if self.fail_play {
            return Err(MediaError::NoOutput);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.events.pop_front()
    }

    fn attach_tap(&mut self, tap: SignalTap) -> Result<(), MediaError> {
        self.tap_attempts += 1;
        if self.tap.is_some() {
            return Err(MediaError::AlreadyTapped);
        }
        self.tap = Some(tap);
        Ok(())
    }

    fn is_tapped(&self) -> bool {
        self.tap.is_some()
    }
}
