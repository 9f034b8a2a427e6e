// src/ui/widgets/player_panel.rs
//! Player information panel widget.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::audio::time::clock_pair;
use crate::audio::{PlaybackState, TrackMetadata};
use crate::ui::layout::panel_layout;

/// What the panel shows besides the playback state.
pub struct PanelInfo<'a> {
    pub track_name: &'a str,
    pub metadata: Option<&'a TrackMetadata>,
    pub skip_seconds: f64,
}

fn info_lines(info: &PanelInfo<'_>, state: &PlaybackState) -> Vec<Line<'static>> {
    let headline = info
        .metadata
        .and_then(TrackMetadata::headline)
        .unwrap_or_else(|| info.track_name.to_string());
    let mut lines = vec![Line::from(Span::styled(
        headline,
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let Some(meta) = info.metadata else {
        lines.push(Line::from("Loading metadata..."));
        return lines;
    };
    if let Some(album) = &meta.album {
        lines.push(Line::from(format!("Album: {album}")));
    }
    if !state.has_duration() && meta.duration_secs > 0.0 {
        lines.push(Line::from(format!("Length: {:.0}s", meta.duration_secs)));
    }
    for (k, v) in meta.tags.iter().chain(&meta.properties) {
        lines.push(Line::from(format!("{k}: {v}")));
    }
    lines
}

/// Volume at or below this percentage shows the low-volume glyph.
const LOW_VOLUME_PERCENT: f64 = 60.0;

fn volume_glyph(state: &PlaybackState) -> Span<'static> {
    if state.is_muted() {
        Span::styled(" 🔇 ", Style::default().fg(Color::Red))
    } else if state.volume_percent() <= LOW_VOLUME_PERCENT {
        Span::styled(" 🔉 ", Style::default().fg(Color::Gray))
    } else {
        Span::styled(" 🔊 ", Style::default().fg(Color::Gray))
    }
}

fn control_line(state: &PlaybackState, skip_seconds: f64) -> Line<'static> {
    let play_pause = if state.is_playing() {
        Span::styled(" ⏸ ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ⏵ ", Style::default().fg(Color::Yellow))
    };
    let mute = volume_glyph(state);

    Line::from(vec![
        Span::styled(format!(" ⏪ {skip_seconds:.0}s "), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        play_pause,
        Span::raw(" "),
        Span::styled(format!(" {skip_seconds:.0}s ⏩ "), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        mute,
    ])
}

/// Render the player information panel.
pub fn render_player_panel(
    f: &mut Frame<'_>,
    area: Rect,
    info: &PanelInfo<'_>,
    state: &PlaybackState,
) {
    f.render_widget(Block::default().borders(Borders::ALL).title("1: Player"), area);
    let rows = panel_layout(area);

    f.render_widget(
        Paragraph::new(info_lines(info, state)).wrap(Wrap { trim: true }),
        rows.info,
    );

    f.render_widget(
        Paragraph::new(control_line(state, info.skip_seconds)).alignment(Alignment::Center),
        rows.controls,
    );

    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
            .ratio(state.progress() / 100.0)
            .label(clock_pair(state.current_time(), state.duration())),
        rows.seek,
    );

    let volume_label = if state.is_muted() {
        "Muted".to_string()
    } else {
        format!("Volume {:.0}%", state.volume_percent())
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue))
            .ratio(state.volume())
            .label(volume_label),
        rows.volume,
    );
}
