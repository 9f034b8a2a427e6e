// src/ui/widgets/mod.rs
//! Custom widgets for the warble UI. The spectrum draws itself through its player.

pub mod player_panel;

// Re-export widget rendering functions
pub use player_panel::{PanelInfo, render_player_panel};
