// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Visibility state for UI sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionVisibility {
    pub player: bool,
    pub visualizer: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            player: true,
            visualizer: true,
        }
    }
}

impl SectionVisibility {
    /// Toggle a section by number (1-2).
    pub fn toggle(&mut self, section: usize) {
        match section {
            1 => self.player = !self.player,
            2 => self.visualizer = !self.visualizer,
            _ => {}
        }
    }
}

/// Computed layout areas for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedLayout {
    pub player_area: Option<Rect>,
    pub spectrum_area: Option<Rect>,
}

/// Rows inside the player panel border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub info: Rect,
    pub controls: Rect,
    pub seek: Rect,
    pub volume: Rect,
}

/// Rows the panel needs besides the metadata text.
const PANEL_FIXED_ROWS: u16 = 2 + 1 + 1 + 1;

/// Compute the layout based on total area and section visibility. The spectrum
/// is only placed when the active player has one.
pub fn compute_layout(
    area: Rect,
    visibility: &SectionVisibility,
    has_spectrum: bool,
) -> ComputedLayout {
    let show_spectrum = visibility.visualizer && has_spectrum;
    match (visibility.player, show_spectrum) {
        (true, true) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(PANEL_FIXED_ROWS + 3), Constraint::Percentage(55)])
                .split(area);
            ComputedLayout {
                player_area: Some(chunks[0]),
                spectrum_area: Some(chunks[1]),
            }
        }
        (true, false) => ComputedLayout {
            player_area: Some(area),
            spectrum_area: None,
        },
        (false, true) => ComputedLayout {
            player_area: None,
            spectrum_area: Some(area),
        },
        (false, false) => ComputedLayout {
            player_area: None,
            spectrum_area: None,
        },
    }
}

/// Split the player panel: metadata, transport buttons, seek bar, volume bar.
pub fn panel_layout(area: Rect) -> PanelLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    PanelLayout {
        info: rows[0],
        controls: rows[1],
        seek: rows[2],
        volume: rows[3],
    }
}

/// Whether a mouse position lands inside `rect`.
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    rect.contains(Position::new(column, row))
}

/// Horizontal position of `column` within `rect` as a ratio in `[0, 1]`.
/// Columns outside the rect clamp to the nearest edge.
pub fn fraction_at(rect: Rect, column: u16) -> f64 {
    if rect.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(rect.x) as f64;
    (offset / (rect.width - 1) as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_only_with_a_spectrum_player() {
        let area = Rect::new(0, 0, 80, 40);
        let vis = SectionVisibility::default();

        let both = compute_layout(area, &vis, true);
        assert!(both.player_area.is_some() && both.spectrum_area.is_some());

        let basic = compute_layout(area, &vis, false);
        assert_eq!(basic.player_area, Some(area));
        assert_eq!(basic.spectrum_area, None);
    }

    #[test]
    fn toggles_hide_sections() {
        let area = Rect::new(0, 0, 80, 40);
        let mut vis = SectionVisibility::default();
        vis.toggle(1);
        let layout = compute_layout(area, &vis, true);
        assert_eq!(layout.player_area, None);
        assert_eq!(layout.spectrum_area, Some(area));

        vis.toggle(2);
        let layout = compute_layout(area, &vis, true);
        assert_eq!(layout.spectrum_area, None);

        vis.toggle(9);
        assert_eq!(vis, SectionVisibility { player: false, visualizer: false });
    }

    #[test]
    fn panel_rows_fit_inside_the_border() {
        let panel = panel_layout(Rect::new(0, 0, 40, 12));
        assert_eq!(panel.info, Rect::new(1, 1, 38, 7));
        assert_eq!(panel.controls.y, 8);
        assert_eq!(panel.seek.y, 9);
        assert_eq!(panel.volume.y, 10);
    }

    #[test]
    fn fraction_spans_the_rect() {
        let rect = Rect::new(10, 0, 11, 1);
        assert_eq!(fraction_at(rect, 10), 0.0);
        assert_eq!(fraction_at(rect, 15), 0.5);
        assert_eq!(fraction_at(rect, 20), 1.0);
        assert_eq!(fraction_at(rect, 2), 0.0);
        assert_eq!(fraction_at(rect, 99), 1.0);
        assert_eq!(fraction_at(Rect::new(0, 0, 1, 1), 0), 0.0);
    }

    #[test]
    fn hit_testing() {
        let rect = Rect::new(5, 5, 4, 1);
        assert!(hit(rect, 5, 5));
        assert!(hit(rect, 8, 5));
        assert!(!hit(rect, 9, 5));
        assert!(!hit(rect, 6, 6));
    }
}
