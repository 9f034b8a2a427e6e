// src/audio/graph/context.rs
//! Processing-context lifecycle and the shared gain scalar.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use tracing::debug;

use super::GraphError;

/// Lifecycle of the processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContextState {
    /// Created but not yet resumed by a user gesture; the tap outputs silence.
    Suspended = 0,
    Running = 1,
    Closed = 2,
}

impl ContextState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ContextState::Running,
            2 => ContextState::Closed,
            _ => ContextState::Suspended,
        }
    }
}

/// Handle to the processing context. Clones share the same state, so the
/// audio thread's tap observes transitions made on the UI side.
#[derive(Debug, Clone)]
pub struct ProcessingContext {
    state: Arc<AtomicU8>,
}

impl ProcessingContext {
    /// New contexts start suspended.
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ContextState::Suspended as u8)),
        }
    }

    pub fn state(&self) -> ContextState {
        ContextState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == ContextState::Running
    }

    /// Move a suspended context to running. Resuming a running context is a no-op.
    pub fn resume(&self) -> Result<(), GraphError> {
        match self.state.compare_exchange(
            ContextState::Suspended as u8,
            ContextState::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                debug!("processing context resumed");
                Ok(())
            }
            Err(current) => match ContextState::from_u8(current) {
                ContextState::Closed => Err(GraphError::ContextClosed),
                _ => Ok(()),
            },
        }
    }

    /// Terminal transition; a closed context never runs again.
    pub fn close(&self) {
        self.state
            .store(ContextState::Closed as u8, Ordering::Release);
        debug!("processing context closed");
    }
}

impl Default for ProcessingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar multiplier applied to every sample passing through the tap.
///
/// Stored as `f32` bits so the audio thread can read it without locking.
#[derive(Debug, Clone)]
pub struct GainNode {
    bits: Arc<AtomicU32>,
}

impl GainNode {
    pub fn new(gain: f64) -> Self {
        let node = Self {
            bits: Arc::new(AtomicU32::new(0)),
        };
        node.set(gain);
        node
    }

    /// Takes effect on the next sample, clamped to `[0, 1]`.
    pub fn set(&self, gain: f64) {
        let gain = if gain.is_finite() { gain.clamp(0.0, 1.0) } else { 0.0 };
        self.bits.store((gain as f32).to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}
