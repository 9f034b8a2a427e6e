// src/app/state.rs
//! Application state: the chosen player variant, track metadata, and layout.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
    time::Instant,
};

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Alignment,
    widgets::{Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::{
    audio::{RodioMedia, TrackMetadata, metadata::load_metadata},
    config::Config,
    fs::Track,
    player::{BasicPlayer, PlayerAction, PlayerOptions, PlayerWidget, SpectrumPlayer},
    ui::{
        keybindings::{NavigationAction, key_to_action},
        layout::{PanelLayout, SectionVisibility, compute_layout, fraction_at, hit, panel_layout},
        widgets::{PanelInfo, render_player_panel},
    },
};

/// Which gauge a mouse drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragTarget {
    Seek,
    Volume,
}

/// Main application state.
pub struct App {
    track: Track,
    track_name: String,

    /// Player variant picked at startup
    player: Box<dyn PlayerWidget>,
    skip_seconds: f64,

    /// Tags and properties, once the background loader delivers them
    metadata: Option<TrackMetadata>,
    /// Metadata channel sender (background loader -> UI)
    meta_tx: Sender<TrackMetadata>,
    /// Metadata channel receiver
    meta_rx: Receiver<TrackMetadata>,

    /// Section visibility state
    pub visibility: SectionVisibility,
    /// Panel rows from the last draw, for mouse hit-testing
    panel: Option<PanelLayout>,
    drag: Option<DragTarget>,
}

impl App {
    /// Open the track on the default output device with the configured variant.
    pub fn new(track: Track, config: &Config) -> Self {
        let options = PlayerOptions::from(config);
        let media = RodioMedia::open(&track);
        let player: Box<dyn PlayerWidget> = if config.player.visualizer {
            info!("starting spectrum player for {}", track.path().display());
            Box::new(SpectrumPlayer::new(media, options.clone()))
        } else {
            info!("starting basic player for {}", track.path().display());
            Box::new(BasicPlayer::new(media, options.clone()))
        };
        Self::with_player(track, player, &options)
    }

    /// Build around an existing player and start the metadata loader.
    pub fn with_player(track: Track, player: Box<dyn PlayerWidget>, options: &PlayerOptions) -> Self {
        let (meta_tx, meta_rx) = std::sync::mpsc::channel::<TrackMetadata>();
        let mut app = Self {
            track_name: track.display_name(),
            track,
            player,
            skip_seconds: options.skip_seconds,
            metadata: None,
            meta_tx,
            meta_rx,
            visibility: SectionVisibility::default(),
            panel: None,
            drag: None,
        };
        app.spawn_metadata_loader();
        app
    }

    fn spawn_metadata_loader(&mut self) {
        let tx = self.meta_tx.clone();
        let path = self.track.path().to_path_buf();
        let spawned = thread::Builder::new()
            .name("warble-metadata".into())
            .spawn(move || match load_metadata(&path) {
                Ok(meta) => {
                    let _ = tx.send(meta);
                }
                Err(e) => warn!("no metadata for {}: {e}", path.display()),
            });
        if let Err(e) = spawned {
            warn!("failed to spawn metadata loader: {e}");
        }
    }

    pub fn player(&self) -> &dyn PlayerWidget {
        self.player.as_ref()
    }

    pub fn metadata(&self) -> Option<&TrackMetadata> {
        self.metadata.as_ref()
    }

    /// Process any pending metadata from background loader.
    pub fn process_metadata(&mut self) {
        if let Ok(meta) = self.meta_rx.try_recv() {
            self.metadata = Some(meta);
        }
    }

    pub fn pump(&mut self) -> usize {
        self.player.pump_media_events()
    }

    pub fn tick(&mut self, now: Instant) {
        self.player.tick(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.player.next_deadline()
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            NavigationAction::Player(action) => self.player.handle_action(action),
            NavigationAction::ToggleSection(d) => self.visibility.toggle(d),
            NavigationAction::Quit => return true,
            NavigationAction::None => {}
        }
        false
    }

    /// Clicks and drags on the seek and volume gauges.
    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let Some(panel) = self.panel else {
            return;
        };
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = if hit(panel.seek, col, row) {
                    Some(DragTarget::Seek)
                } else if hit(panel.volume, col, row) {
                    Some(DragTarget::Volume)
                } else {
                    None
                };
                self.apply_drag(&panel, col);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.apply_drag(&panel, col),
            MouseEventKind::Up(MouseButton::Left) => self.drag = None,
            _ => {}
        }
    }

    fn apply_drag(&mut self, panel: &PanelLayout, col: u16) {
        let action = match self.drag {
            Some(DragTarget::Seek) => PlayerAction::SeekToFraction(fraction_at(panel.seek, col)),
            Some(DragTarget::Volume) => {
                PlayerAction::VolumeToFraction(fraction_at(panel.volume, col))
            }
            None => return,
        };
        self.player.handle_action(action);
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let area = f.area();
        let layout = compute_layout(area, &self.visibility, self.player.has_spectrum());

        self.panel = layout.player_area.map(panel_layout);
        if let Some(player_area) = layout.player_area {
            let info = PanelInfo {
                track_name: &self.track_name,
                metadata: self.metadata.as_ref(),
                skip_seconds: self.skip_seconds,
            };
            render_player_panel(f, player_area, &info, self.player.state());
        }

        if let Some(spectrum_area) = layout.spectrum_area {
            self.player.render_spectrum(f, spectrum_area);
        }

        if layout.player_area.is_none() && layout.spectrum_area.is_none() {
            f.render_widget(
                Paragraph::new("All sections hidden. Shift+1 shows the player.")
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
    }

    /// Stop playback and release audio resources.
    pub fn teardown(&mut self) {
        self.player.teardown();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::audio::media::fake::FakeMedia;

    fn track() -> (tempfile::TempDir, Track) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.mp3");
        // ID3 magic is enough for detection
        std::fs::write(&path, b"ID3\x04\0\0\0\0\0\0").unwrap();
        let track = Track::open(&path).unwrap();
        (dir, track)
    }

    fn app(duration: f64) -> (tempfile::TempDir, App) {
        let (dir, track) = track();
        let options = PlayerOptions::default();
        let player = SpectrumPlayer::new(FakeMedia::new(Some(duration)), options.clone());
        let mut app = App::with_player(track, Box::new(player), &options);
        app.pump();
        (dir, app)
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keys_drive_the_player() {
        let (_dir, mut app) = app(200.0);
        assert!(!press(&mut app, KeyCode::Char(' ')));
        assert!(app.player().state().is_playing());

        press(&mut app, KeyCode::Right);
        assert_eq!(app.player().state().current_time(), 15.0);

        press(&mut app, KeyCode::Char('m'));
        assert!(app.player().state().is_muted());

        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn section_toggles_change_the_layout() {
        let (_dir, mut app) = app(200.0);
        press(&mut app, KeyCode::Char('!'));
        assert!(!app.visibility.player);

        draw(&mut app);
        // Hidden panel means clicks have nothing to land on
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2));
        assert_eq!(app.player().state().current_time(), 0.0);
    }

    #[test]
    fn clicking_and_dragging_the_seek_bar() {
        let (_dir, mut app) = app(200.0);
        draw(&mut app);
        let seek = app.panel.unwrap().seek;

        let right = seek.x + seek.width - 1;
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), right, seek.y));
        assert_eq!(app.player().state().current_time(), 200.0);

        // Dragging past the left edge clamps to the start
        app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 0, seek.y + 3));
        assert_eq!(app.player().state().current_time(), 0.0);

        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, seek.y));
        app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), right, seek.y));
        assert_eq!(app.player().state().current_time(), 0.0);
    }

    #[test]
    fn clicking_the_volume_bar() {
        let (_dir, mut app) = app(200.0);
        draw(&mut app);
        let volume = app.panel.unwrap().volume;

        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), volume.x, volume.y));
        assert!(app.player().state().is_muted());
    }

    #[test]
    fn metadata_arrives_over_the_channel() {
        let (_dir, mut app) = app(200.0);
        let meta = TrackMetadata {
            title: Some("Tone".into()),
            ..Default::default()
        };
        app.meta_tx.send(meta).unwrap();
        // The loader thread may also deliver; drain until ours shows up.
        for _ in 0..2 {
            app.process_metadata();
            if app.metadata().and_then(|m| m.title.as_deref()) == Some("Tone") {
                return;
            }
        }
        panic!("metadata never arrived");
    }
}
