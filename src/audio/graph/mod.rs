// src/audio/graph/mod.rs
//! Audio processing graph tapped off the media element.
//!
//! Connection order is fixed: source -> gain -> analyser -> destination. The
//! analyser sees the post-gain signal, so muting also flattens the spectrum and
//! what is drawn always matches what is heard.

mod analyser;
mod context;
mod tap;

use thiserror::Error;
use tracing::{debug, info};

use super::media::{MediaElement, MediaError};

pub use analyser::{Analyser, MAX_FFT_SIZE, MAX_MAGNITUDE, MIN_FFT_SIZE};
pub use context::{ContextState, GainNode, ProcessingContext};
pub use tap::{CaptureBuffer, SignalTap, TapSlot, TapSource};

/// Errors raised while building or driving the graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("audio graph is not initialized")]
    NotInitialized,

    #[error("processing context is closed")]
    ContextClosed,

    #[error("invalid fft size {0}: expected a power of two between 32 and 32768")]
    InvalidFftSize(usize),

    #[error("invalid smoothing time constant {0}: expected a value in [0, 1)")]
    InvalidSmoothing(f32),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Analyser parameters fixed for the lifetime of a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserSettings {
    pub fft_size: usize,
    pub smoothing: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.8,
        }
    }
}

/// The nodes of one initialized graph.
pub struct AudioGraph {
    context: ProcessingContext,
    gain: GainNode,
    analyser: Analyser,
}

impl AudioGraph {
    pub fn context(&self) -> &ProcessingContext {
        &self.context
    }

    pub fn gain(&self) -> &GainNode {
        &self.gain
    }

    pub fn analyser(&self) -> &Analyser {
        &self.analyser
    }
}

/// Owns at most one graph per player, built lazily against its media element.
pub struct AudioGraphManager {
    settings: AnalyserSettings,
    graph: Option<AudioGraph>,
}

impl AudioGraphManager {
    pub fn new(settings: AnalyserSettings) -> Self {
        Self {
            settings,
            graph: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.graph.is_some()
    }

    pub fn graph(&self) -> Option<&AudioGraph> {
        self.graph.as_ref()
    }

    /// Build the graph and tap `media`. Calling this again once a graph exists
    /// is a no-op, so the element is never tapped twice by this manager.
    pub fn initialize<M: MediaElement>(
        &mut self,
        media: &mut M,
        initial_gain: f64,
    ) -> Result<(), GraphError> {
        if self.graph.is_some() {
            debug!("audio graph already initialized");
            return Ok(());
        }
        if media.is_tapped() {
            return Err(MediaError::AlreadyTapped.into());
        }

        let analyser = Analyser::new(self.settings.fft_size, self.settings.smoothing)?;
        let context = ProcessingContext::new();
        let gain = GainNode::new(initial_gain);
        let tap = SignalTap::new(context.clone(), gain.clone(), analyser.capture_buffer());
        media.attach_tap(tap)?;

        info!(
            fft_size = analyser.fft_size(),
            bins = analyser.bin_count(),
            "audio graph initialized"
        );
        self.graph = Some(AudioGraph {
            context,
            gain,
            analyser,
        });
        Ok(())
    }

    pub fn context_state(&self) -> Option<ContextState> {
        self.graph.as_ref().map(|g| g.context.state())
    }

    pub fn resume(&mut self) -> Result<(), GraphError> {
        self.graph
            .as_ref()
            .ok_or(GraphError::NotInitialized)?
            .context
            .resume()
    }

    /// No-op until the graph exists.
    pub fn set_gain(&self, gain: f64) {
        if let Some(graph) = &self.graph {
            graph.gain.set(gain);
        }
    }

    pub fn gain(&self) -> Option<GainNode> {
        self.graph.as_ref().map(|g| g.gain.clone())
    }

    pub fn bin_count(&self) -> Option<usize> {
        self.graph.as_ref().map(|g| g.analyser.bin_count())
    }

    /// Latest magnitude snapshot, `None` before initialization.
    pub fn sample_frequencies(&mut self) -> Option<&[u8]> {
        self.graph.as_mut().map(|g| g.analyser.frequency_data())
    }

    /// Close the context; the tap goes silent and stops capturing.
    pub fn teardown(&mut self) {
        if let Some(graph) = self.graph.take() {
            graph.context.close();
            info!("audio graph torn down");
        }
    }
}

impl Drop for AudioGraphManager {
    fn drop(&mut self) {
        self.teardown();
    }
}
