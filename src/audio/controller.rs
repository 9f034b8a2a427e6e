// src/audio/controller.rs
//! Playback controller: owns the playback state and commands the media element.

use tracing::{debug, warn};

use super::graph::{AudioGraphManager, ContextState, GainNode};
use super::media::{MediaElement, MediaEvent};
use super::state::{PlaybackState, clamp_unit};

/// Where volume changes are applied.
#[derive(Debug, Clone)]
enum VolumeRoute {
    /// The media element's own volume.
    Native,
    /// The graph's gain node; the element stays at full volume.
    Gain(GainNode),
}

/// Commands flow from here to the media element; the element's events flow
/// back through [`PlaybackController::handle_event`].
pub struct PlaybackController<M> {
    media: Option<M>,
    state: PlaybackState,
    route: VolumeRoute,
}

impl<M: MediaElement> PlaybackController<M> {
    /// A controller with no media element attached yet.
    pub fn new(initial_volume: f64) -> Self {
        Self {
            media: None,
            state: PlaybackState::new(initial_volume),
            route: VolumeRoute::Native,
        }
    }

    pub fn with_media(media: M, initial_volume: f64) -> Self {
        let mut controller = Self::new(initial_volume);
        controller.attach(media);
        controller
    }

    /// Bind the media element and push the current volume to it.
    pub fn attach(&mut self, mut media: M) {
        media.set_volume(self.state.volume());
        if let Some(d) = media.duration() {
            self.state.set_duration(d);
        }
        self.media = Some(media);
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    pub fn media_mut(&mut self) -> Option<&mut M> {
        self.media.as_mut()
    }

    /// Send volume through `gain` from now on. The element is pinned at full
    /// volume so the two multipliers don't compound.
    pub fn route_volume_to(&mut self, gain: GainNode) {
        gain.set(self.state.volume());
        if let Some(media) = self.media.as_mut() {
            media.set_volume(1.0);
        }
        self.route = VolumeRoute::Gain(gain);
    }

    /// Play or pause. A suspended processing context is resumed first; if that
    /// fails the transport is left untouched.
    pub fn toggle_play(&mut self, graph: Option<&mut AudioGraphManager>) {
        let Some(media) = self.media.as_mut() else {
            debug!("toggle_play ignored: no media element");
            return;
        };

        if let Some(graph) = graph {
            if graph.context_state() == Some(ContextState::Suspended) {
                if let Err(e) = graph.resume() {
                    warn!("could not resume processing context: {e}");
                    return;
                }
            }
        }

        if self.state.is_playing() {
            media.pause();
            self.state.set_playing(false);
            debug!("paused at {:.2}s", self.state.current_time());
        } else {
            match media.play() {
                Ok(()) => {
                    self.state.set_playing(true);
                    debug!("playing from {:.2}s", self.state.current_time());
                }
                Err(e) => warn!("play failed: {e}"),
            }
        }
    }

    /// Move to `target` seconds, clamped to the seek slider's range.
    pub fn seek(&mut self, target: f64) {
        let Some(media) = self.media.as_mut() else {
            return;
        };
        let t = self.state.clamp_time(target);
        media.set_current_time(t);
        self.state.set_current_time(t);
    }

    /// Seek using the `[0, 100]` progress scale.
    pub fn seek_by_progress(&mut self, progress: f64) {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.seek(progress * self.state.progress_scale());
    }

    /// Jump by `delta` seconds relative to the current position.
    pub fn skip(&mut self, delta: f64) {
        self.seek(self.state.current_time() + delta);
    }

    pub fn set_volume(&mut self, volume: f64) {
        let volume = self.state.set_volume(volume);
        match &self.route {
            VolumeRoute::Gain(gain) => gain.set(volume),
            VolumeRoute::Native => {
                if let Some(media) = self.media.as_mut() {
                    media.set_volume(volume);
                }
            }
        }
    }

    /// Set volume on the `[0, 100]` slider scale.
    pub fn set_volume_by_percent(&mut self, percent: f64) {
        self.set_volume(clamp_unit(percent / 100.0));
    }

    /// Mute, remembering the current volume, or restore the remembered one.
    pub fn toggle_mute(&mut self) {
        let volume = self.state.volume();
        if volume > 0.0 {
            self.state.stash_volume(volume);
            self.set_volume(0.0);
        } else {
            let restore = self.state.prev_volume();
            self.set_volume(restore);
        }
    }

    pub fn poll_event(&mut self) -> Option<MediaEvent> {
        self.media.as_mut()?.poll_event()
    }

    /// Reconcile state with a native event.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata { duration } => self.on_loaded_metadata(duration),
            MediaEvent::TimeUpdate { current_time } => self.on_time_update(current_time),
            MediaEvent::Ended => self.on_ended(),
        }
    }

    pub fn on_loaded_metadata(&mut self, duration: f64) {
        self.state.set_duration(duration);
        debug!("duration known: {:.2}s", self.state.duration());
    }

    /// Re-applying an echo of our own seek lands on the same value.
    pub fn on_time_update(&mut self, current_time: f64) {
        self.state.set_current_time(current_time);
    }

    /// Stop at the end. Without a known duration the last reported position stays.
    pub fn on_ended(&mut self) {
        self.state.set_playing(false);
        if self.state.has_duration() {
            let end = self.state.duration();
            self.state.set_current_time(end);
        }
        debug!("playback ended");
    }

    /// Stop the transport and release the element.
    pub fn teardown(&mut self) {
        if let Some(mut media) = self.media.take() {
            media.pause();
        }
        self.state.set_playing(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::graph::AnalyserSettings;
    use crate::audio::media::fake::FakeMedia;
    use proptest::prelude::*;

    fn loaded(duration: f64) -> PlaybackController<FakeMedia> {
        let mut controller = PlaybackController::with_media(FakeMedia::new(Some(duration)), 1.0);
        drain(&mut controller);
        controller
    }

    fn drain(controller: &mut PlaybackController<FakeMedia>) {
        while let Some(event) = controller.poll_event() {
            controller.handle_event(event);
        }
    }

    #[test]
    fn everything_is_inert_without_media() {
        let mut controller: PlaybackController<FakeMedia> = PlaybackController::new(0.5);
        controller.toggle_play(None);
        controller.seek(10.0);
        controller.skip(15.0);
        assert!(!controller.state().is_playing());
        assert_eq!(controller.state().current_time(), 0.0);
        assert!(controller.poll_event().is_none());
    }

    #[test]
    fn toggle_play_flips_transport() {
        let mut controller = loaded(200.0);
        controller.toggle_play(None);
        assert!(controller.state().is_playing());
        assert!(!controller.media().unwrap().paused());

        controller.toggle_play(None);
        assert!(!controller.state().is_playing());
        assert!(controller.media().unwrap().paused());
    }

    #[test]
    fn failed_play_leaves_state_paused() {
        let mut controller =
            PlaybackController::with_media(FakeMedia::new(Some(10.0)).failing_play(), 1.0);
        controller.toggle_play(None);
        assert!(!controller.state().is_playing());
        assert_eq!(controller.media().unwrap().play_calls(), 1);
    }

    #[test]
    fn play_resumes_a_suspended_context_first() {
        let mut controller = loaded(200.0);
        let mut graph = AudioGraphManager::new(AnalyserSettings::default());
        graph
            .initialize(controller.media_mut().unwrap(), 1.0)
            .unwrap();
        assert_eq!(graph.context_state(), Some(ContextState::Suspended));

        controller.toggle_play(Some(&mut graph));
        assert_eq!(graph.context_state(), Some(ContextState::Running));
        assert!(controller.state().is_playing());
    }

    #[test]
    fn closed_context_blocks_play() {
        let mut controller = loaded(200.0);
        let mut graph = AudioGraphManager::new(AnalyserSettings::default());
        graph
            .initialize(controller.media_mut().unwrap(), 1.0)
            .unwrap();
        graph.graph().unwrap().context().close();

        controller.toggle_play(Some(&mut graph));
        assert!(!controller.state().is_playing());
        assert_eq!(controller.media().unwrap().play_calls(), 0);
    }

    #[test]
    fn seek_by_progress_on_a_200s_track() {
        let mut controller = loaded(200.0);
        controller.seek_by_progress(50.0);
        drain(&mut controller);
        assert_eq!(controller.state().current_time(), 100.0);
        assert_eq!(
            crate::audio::time::clock_pair(
                controller.state().current_time(),
                controller.state().duration()
            ),
            "01:40 / 03:20"
        );
    }

    #[test]
    fn seek_by_progress_without_duration_scales_by_one() {
        let mut controller = PlaybackController::with_media(FakeMedia::new(None), 1.0);
        controller.seek_by_progress(42.0);
        assert_eq!(controller.state().current_time(), 42.0);
    }

    #[test]
    fn seek_never_leaves_the_slider_range() {
        let mut controller = loaded(60.0);
        controller.seek(-5.0);
        assert_eq!(controller.media().unwrap().current_time(), 0.0);
        controller.seek(600.0);
        assert_eq!(controller.media().unwrap().current_time(), 60.0);
        controller.seek(f64::NAN);
        assert_eq!(controller.state().current_time(), 0.0);
    }

    #[test]
    fn repeated_seek_does_not_drift() {
        let mut controller = loaded(180.0);
        controller.seek(73.5);
        drain(&mut controller);
        controller.seek(73.5);
        drain(&mut controller);
        assert_eq!(controller.state().current_time(), 73.5);
        assert_eq!(controller.media().unwrap().current_time(), 73.5);
    }

    #[test]
    fn skip_clamps_at_both_ends() {
        let mut controller = loaded(100.0);
        controller.seek(10.0);
        controller.skip(-15.0);
        assert_eq!(controller.state().current_time(), 0.0);

        controller.seek(90.0);
        controller.skip(15.0);
        assert_eq!(controller.state().current_time(), 100.0);

        controller.seek(40.0);
        controller.skip(15.0);
        assert_eq!(controller.state().current_time(), 55.0);
    }

    #[test]
    fn mute_round_trip_restores_volume() {
        let mut controller = loaded(100.0);
        controller.set_volume(0.4);
        controller.toggle_mute();
        assert_eq!(controller.state().volume(), 0.0);
        assert_eq!(controller.media().unwrap().volume(), 0.0);
        controller.toggle_mute();
        assert_eq!(controller.state().volume(), 0.4);
        assert_eq!(controller.media().unwrap().volume(), 0.4);
    }

    #[test]
    fn unmute_without_a_stash_stays_silent() {
        let mut controller = loaded(100.0);
        controller.set_volume(0.0);
        controller.toggle_mute();
        assert_eq!(controller.state().volume(), 0.0);
    }

    #[test]
    fn volume_percent_scale() {
        let mut controller = loaded(100.0);
        controller.set_volume_by_percent(35.0);
        assert!((controller.state().volume() - 0.35).abs() < 1e-12);
        controller.set_volume_by_percent(250.0);
        assert_eq!(controller.state().volume(), 1.0);
    }

    #[test]
    fn routed_volume_drives_the_gain_node() {
        let mut controller = loaded(100.0);
        controller.set_volume(0.6);
        let gain = GainNode::new(1.0);
        controller.route_volume_to(gain.clone());
        assert!((gain.get() - 0.6).abs() < 1e-6);
        assert_eq!(controller.media().unwrap().volume(), 1.0);

        controller.toggle_mute();
        assert_eq!(gain.get(), 0.0);
        assert_eq!(controller.media().unwrap().volume(), 1.0);
    }

    #[test]
    fn ended_event_stops_playback() {
        let mut controller = loaded(30.0);
        controller.toggle_play(None);
        controller.media_mut().unwrap().advance(31.0);
        drain(&mut controller);
        assert!(!controller.state().is_playing());
        assert_eq!(controller.state().current_time(), 30.0);
    }

    #[test]
    fn end_of_unknown_length_track_keeps_the_clock() {
        let mut controller = PlaybackController::with_media(FakeMedia::new(None), 1.0);
        controller.toggle_play(None);
        controller.media_mut().unwrap().advance(42.5);
        drain(&mut controller);
        assert_eq!(controller.state().current_time(), 42.5);

        controller.media_mut().unwrap().finish();
        drain(&mut controller);
        assert!(!controller.state().is_playing());
        assert_eq!(controller.state().current_time(), 42.5);
    }

    proptest! {
        #[test]
        fn progress_maps_linearly(duration in 1.0f64..10_000.0, p in 0.0f64..=100.0) {
            let mut controller = loaded(duration);
            controller.seek_by_progress(p);
            drain(&mut controller);
            let expected = p * (duration / 100.0);
            prop_assert!((controller.state().current_time() - expected).abs() < 1e-9 * duration.max(1.0));
        }

        #[test]
        fn seek_is_idempotent(duration in 1.0f64..10_000.0, x in -100.0f64..20_000.0) {
            let mut controller = loaded(duration);
            controller.seek(x);
            drain(&mut controller);
            let first = controller.state().current_time();
            controller.seek(x);
            drain(&mut controller);
            prop_assert_eq!(controller.state().current_time(), first);
            prop_assert!((0.0..=duration).contains(&first));
        }

        #[test]
        fn mute_twice_restores(v in 0.01f64..=1.0) {
            let mut controller = loaded(10.0);
            controller.set_volume(v);
            controller.toggle_mute();
            controller.toggle_mute();
            prop_assert_eq!(controller.state().volume(), v);
        }
    }
}
