// src/audio/mod.rs
//! Audio module - playback control, the analysis graph, and the spectrum.

pub mod controller;
pub mod graph;
pub mod media;
pub mod metadata;
pub mod state;
pub mod time;
pub mod visualizer;

// Re-export commonly used types
pub use controller::PlaybackController;
pub use graph::{AudioGraphManager, ContextState};
pub use media::{MediaElement, MediaError, MediaEvent, RodioMedia};
pub use metadata::{TagEntry, TrackMetadata};
pub use state::PlaybackState;
pub use visualizer::SpectrumRenderer;
