// src/player/basic.rs
//! Transport, seek and volume over the element's native volume. No audio graph.

use std::time::Instant;

use ratatui::{Frame, layout::Rect};

use super::{PlayerAction, PlayerOptions, PlayerWidget, apply_transport_action};
use crate::audio::{MediaElement, PlaybackController, PlaybackState};

pub struct BasicPlayer<M> {
    controller: PlaybackController<M>,
    options: PlayerOptions,
}

impl<M: MediaElement> BasicPlayer<M> {
    pub fn new(media: M, options: PlayerOptions) -> Self {
        Self {
            controller: PlaybackController::with_media(media, options.initial_volume),
            options,
        }
    }

    pub fn controller(&self) -> &PlaybackController<M> {
        &self.controller
    }
}

impl<M: MediaElement> PlayerWidget for BasicPlayer<M> {
    fn handle_action(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::TogglePlay => self.controller.toggle_play(None),
            other => apply_transport_action(&mut self.controller, &self.options, other),
        }
    }

    fn pump_media_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.controller.poll_event() {
            self.controller.handle_event(event);
            handled += 1;
        }
        handled
    }

    fn tick(&mut self, _now: Instant) {}

    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    fn has_spectrum(&self) -> bool {
        false
    }

    fn render_spectrum(&mut self, _f: &mut Frame<'_>, _area: Rect) {}

    fn teardown(&mut self) {
        self.controller.teardown();
    }
}
