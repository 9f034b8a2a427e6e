// src/audio/graph/tap.rs
//! The tap node: reads a media element's output into the processing graph.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use ringbuf::{HeapRb, traits::*};
use rodio::Source;
use rodio::source::SeekError;

use super::context::{GainNode, ProcessingContext};

/// Rolling window of mono samples read by the analyser.
pub type CaptureBuffer = Arc<Mutex<HeapRb<f32>>>;

/// Slot a media element keeps for its tap. `OnceLock` makes a second attach fail.
pub type TapSlot = Arc<OnceLock<SignalTap>>;

/// Shared handles the tap needs on the audio thread.
#[derive(Clone)]
pub struct SignalTap {
    context: ProcessingContext,
    gain: GainNode,
    capture: CaptureBuffer,
}

// Manual impl: `HeapRb` does not implement `Debug`.
impl std::fmt::Debug for SignalTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalTap")
            .field("context", &self.context)
            .field("gain", &self.gain)
            .finish_non_exhaustive()
    }
}

impl SignalTap {
    pub fn new(context: ProcessingContext, gain: GainNode, capture: CaptureBuffer) -> Self {
        Self {
            context,
            gain,
            capture,
        }
    }

    /// Apply gain to one sample. Returns silence while the context isn't running.
    pub fn process(&self, sample: f32) -> f32 {
        if !self.context.is_running() {
            return 0.0;
        }
        sample * self.gain.get()
    }

    /// Push one mono frame into the analyser window, dropping the oldest if full.
    pub fn capture(&self, sample: f32) {
        if !self.context.is_running() {
            return;
        }
        if let Ok(mut buf) = self.capture.lock() {
            if buf.is_full() {
                let _ = buf.try_pop();
            }
            let _ = buf.try_push(sample);
        }
    }
}

/// Source wrapper that routes samples through the tap once one is attached:
/// source -> gain -> analyser capture -> output.
pub struct TapSource<S> {
    source: S,
    slot: TapSlot,
    frame_sum: f32,
    frame_pos: u16,
}

impl<S> TapSource<S> {
    pub fn new(source: S, slot: TapSlot) -> Self {
        Self {
            source,
            slot,
            frame_sum: 0.0,
            frame_pos: 0,
        }
    }
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;
        let Some(tap) = self.slot.get() else {
            return Some(sample);
        };

        let out = tap.process(sample);

        // Interleaved channels are averaged into one analyser sample per frame.
        self.frame_sum += out;
        self.frame_pos += 1;
        let channels = self.source.channels().max(1);
        if self.frame_pos >= channels {
            tap.capture(self.frame_sum / self.frame_pos as f32);
            self.frame_sum = 0.0;
            self.frame_pos = 0;
        }

        Some(out)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        self.source.try_seek(pos)
    }
}
