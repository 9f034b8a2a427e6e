// src/audio/visualizer/mod.rs
//! Real-time spectrum renderer driven by display frames.

mod renderer;
mod scheduler;
mod surface;

use tracing::debug;

pub use renderer::{BarLayout, bar_color, paint_bars};
pub use scheduler::{FrameClock, FrameHandle, FrameScheduler};
pub use surface::{CellSurface, DrawSurface, Rgb, SUBROWS_PER_CELL};

#[cfg(test)]
pub use surface::{PaintOp, RecordingSurface};

/// Whether a redraw is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Idle,
    /// `pending` is the only frame allowed to draw.
    Running { pending: FrameHandle },
}

/// Redraws the spectrum once per display frame while playback runs.
pub struct SpectrumRenderer {
    layout: BarLayout,
    state: RendererState,
    frames_drawn: u64,
    last_bar_count: usize,
}

impl SpectrumRenderer {
    pub fn new(layout: BarLayout) -> Self {
        Self {
            layout,
            state: RendererState::Idle,
            frames_drawn: 0,
            last_bar_count: 0,
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RendererState::Running { .. })
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Bars painted by the most recent frame.
    pub fn last_bar_count(&self) -> usize {
        self.last_bar_count
    }

    /// Idle -> Running. Already running renderers keep their pending frame.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.state == RendererState::Idle {
            let pending = scheduler.request_frame();
            self.state = RendererState::Running { pending };
            debug!("spectrum renderer running");
        }
    }

    /// Running -> Idle, cancelling the frame that would have drawn next.
    pub fn stop<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let RendererState::Running { pending } = self.state {
            scheduler.cancel_frame(pending);
            self.state = RendererState::Idle;
            debug!("spectrum renderer idle");
        }
    }

    /// Frame callback. Frames other than the pending one are ignored. A missing
    /// frequency buffer skips painting but keeps the chain alive. The next frame
    /// is requested only if the renderer is still running once painting is done.
    ///
    /// Returns whether the frame was accepted.
    pub fn on_frame<S, D>(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut S,
        frequencies: Option<&[u8]>,
        surface: &mut D,
    ) -> bool
    where
        S: FrameScheduler + ?Sized,
        D: DrawSurface + ?Sized,
    {
        match self.state {
            RendererState::Running { pending } if pending == handle => {}
            _ => return false,
        }

        if let Some(frequencies) = frequencies {
            self.last_bar_count = paint_bars(&self.layout, frequencies, surface);
            self.frames_drawn += 1;
        }

        if self.is_running() {
            let pending = scheduler.request_frame();
            self.state = RendererState::Running { pending };
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn layout() -> BarLayout {
        BarLayout {
            bar_count: 8,
            bar_gap: 1.0,
            spectrum_range: 1.0,
        }
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(1)
    }

    #[test]
    fn start_schedules_and_first_frame_paints_every_bar() {
        let mut clock = FrameClock::new(60);
        let mut renderer = SpectrumRenderer::new(layout());
        let mut surface = RecordingSurface::new(80.0, 40.0);

        renderer.start(&mut clock);
        assert!(renderer.is_running());

        let handle = clock.take_due(later()).unwrap();
        assert!(renderer.on_frame(handle, &mut clock, Some(&[128; 64]), &mut surface));
        assert_eq!(surface.rects().len(), 8);
        assert_eq!(renderer.last_bar_count(), 8);
        assert_eq!(renderer.frames_drawn(), 1);
        assert!(clock.pending().is_some());
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let mut clock = FrameClock::new(60);
        let mut renderer = SpectrumRenderer::new(layout());
        renderer.start(&mut clock);
        renderer.stop(&mut clock);

        assert_eq!(renderer.state(), RendererState::Idle);
        assert!(clock.pending().is_none());
        assert!(clock.take_due(later()).is_none());
    }

    #[test]
    fn stale_frame_is_ignored_after_restart() {
        let mut clock = FrameClock::new(60);
        let mut renderer = SpectrumRenderer::new(layout());
        let mut surface = RecordingSurface::new(80.0, 40.0);

        renderer.start(&mut clock);
        let stale = clock.pending().unwrap();
        renderer.stop(&mut clock);
        renderer.start(&mut clock);

        assert!(!renderer.on_frame(stale, &mut clock, Some(&[1; 8]), &mut surface));
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn idle_frame_does_not_rearm() {
        let mut clock = FrameClock::new(60);
        let mut renderer = SpectrumRenderer::new(layout());
        let mut surface = RecordingSurface::new(80.0, 40.0);

        renderer.start(&mut clock);
        let handle = clock.take_due(later()).unwrap();
        renderer.stop(&mut clock);

        assert!(!renderer.on_frame(handle, &mut clock, Some(&[1; 8]), &mut surface));
        assert!(clock.pending().is_none());
    }

    #[test]
    fn missing_buffer_keeps_the_chain() {
        let mut clock = FrameClock::new(60);
        let mut renderer = SpectrumRenderer::new(layout());
        let mut surface = RecordingSurface::new(80.0, 40.0);

        renderer.start(&mut clock);
        let handle = clock.take_due(later()).unwrap();
        assert!(renderer.on_frame(handle, &mut clock, None, &mut surface));
        assert!(surface.ops.is_empty());
        assert_eq!(renderer.frames_drawn(), 0);
        assert!(clock.pending().is_some());
    }

    #[test]
    fn start_twice_keeps_one_request() {
        let mut clock = FrameClock::new(60);
        let mut renderer = SpectrumRenderer::new(layout());
        renderer.start(&mut clock);
        let first = clock.pending();
        renderer.start(&mut clock);
        assert_eq!(clock.pending(), first);
    }
}
