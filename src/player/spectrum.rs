// src/player/spectrum.rs
//! Player with an audio graph and a live spectrum.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders},
};
use tracing::warn;

use super::{PlayerAction, PlayerOptions, PlayerWidget, apply_transport_action};
use crate::audio::graph::AudioGraphManager;
use crate::audio::visualizer::{CellSurface, FrameClock, SpectrumRenderer};
use crate::audio::{MediaElement, MediaEvent, PlaybackController, PlaybackState};

pub struct SpectrumPlayer<M> {
    controller: PlaybackController<M>,
    graph: AudioGraphManager,
    renderer: SpectrumRenderer,
    clock: FrameClock,
    surface: CellSurface,
    options: PlayerOptions,
}

impl<M: MediaElement> SpectrumPlayer<M> {
    pub fn new(media: M, options: PlayerOptions) -> Self {
        Self {
            controller: PlaybackController::with_media(media, options.initial_volume),
            graph: AudioGraphManager::new(options.analyser),
            renderer: SpectrumRenderer::new(options.bars),
            clock: FrameClock::new(options.frame_rate),
            surface: CellSurface::default(),
            options,
        }
    }

    pub fn controller(&self) -> &PlaybackController<M> {
        &self.controller
    }

    pub fn graph(&self) -> &AudioGraphManager {
        &self.graph
    }

    pub fn renderer(&self) -> &SpectrumRenderer {
        &self.renderer
    }

    /// Size the drawing surface, normally done by the first render.
    pub fn mount_surface(&mut self, cols: u16, rows: u16) {
        self.surface.resize(cols, rows);
    }

    /// Build the graph on the first play gesture. Failure leaves the player on
    /// the element's native volume without a spectrum.
    fn ensure_graph(&mut self) {
        if self.graph.is_initialized() {
            return;
        }
        let volume = self.controller.state().volume();
        let Some(media) = self.controller.media_mut() else {
            return;
        };
        if let Err(e) = self.graph.initialize(media, volume) {
            warn!("audio graph unavailable: {e}");
            return;
        }
        if let Some(gain) = self.graph.gain() {
            self.controller.route_volume_to(gain);
        }
    }

    fn toggle_play(&mut self) {
        self.ensure_graph();
        let graph = self
            .graph
            .is_initialized()
            .then_some(&mut self.graph);
        self.controller.toggle_play(graph);
        self.sync_renderer();
    }

    fn sync_renderer(&mut self) {
        if self.controller.state().is_playing() {
            self.renderer.start(&mut self.clock);
        } else {
            self.renderer.stop(&mut self.clock);
        }
    }
}

impl<M: MediaElement> PlayerWidget for SpectrumPlayer<M> {
    fn handle_action(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::TogglePlay => self.toggle_play(),
            other => apply_transport_action(&mut self.controller, &self.options, other),
        }
    }

    fn pump_media_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.controller.poll_event() {
            self.controller.handle_event(event);
            if event == MediaEvent::Ended {
                self.renderer.stop(&mut self.clock);
            }
            handled += 1;
        }
        handled
    }

    fn tick(&mut self, now: Instant) {
        if let Some(handle) = self.clock.take_due(now) {
            let frequencies = self.graph.sample_frequencies();
            self.renderer
                .on_frame(handle, &mut self.clock, frequencies, &mut self.surface);
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.clock.deadline()
    }

    fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    fn has_spectrum(&self) -> bool {
        true
    }

    fn render_spectrum(&mut self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("2: Spectrum");
        let inner = block.inner(area);
        self.surface.resize(inner.width, inner.height);
        f.render_widget(block, area);
        f.render_widget(&self.surface, inner);
    }

    fn teardown(&mut self) {
        self.renderer.stop(&mut self.clock);
        self.graph.teardown();
        self.controller.teardown();
    }
}
