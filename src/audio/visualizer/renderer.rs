// src/audio/visualizer/renderer.rs
//! Spectrum bar painting.

use super::surface::{DrawSurface, Rgb};
use crate::audio::graph::MAX_MAGNITUDE;

/// Bar geometry for one spectrum frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    /// Number of equal-width bars across the surface.
    pub bar_count: usize,
    /// Gap between bars, in surface pixels.
    pub bar_gap: f64,
    /// Fraction of the frequency buffer spread across the bars, from the lowest bin.
    pub spectrum_range: f64,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            bar_count: 32,
            bar_gap: 1.0,
            spectrum_range: 0.7,
        }
    }
}

impl BarLayout {
    pub fn bar_width(&self, surface_width: f64) -> f64 {
        if self.bar_count == 0 {
            return 0.0;
        }
        let gaps = self.bar_gap * (self.bar_count - 1) as f64;
        ((surface_width - gaps) / self.bar_count as f64).max(0.0)
    }

    /// Shrink the bar count so every bar is at least one pixel wide on a
    /// surface `surface_width` pixels across. The gap is kept.
    pub fn fitted(&self, surface_width: f64) -> BarLayout {
        if self.bar_width(surface_width) >= 1.0 {
            return *self;
        }
        let fits = ((surface_width + self.bar_gap) / (1.0 + self.bar_gap)).floor();
        let bar_count = if fits.is_finite() && fits > 0.0 {
            (fits as usize).min(self.bar_count)
        } else {
            0
        };
        BarLayout { bar_count, ..*self }
    }

    /// Frequency bin shown by bar `index` out of `bins`.
    pub fn bin_for_bar(&self, index: usize, bins: usize) -> usize {
        if bins == 0 || self.bar_count == 0 {
            return 0;
        }
        let span = bins as f64 * self.spectrum_range.clamp(0.0, 1.0);
        let bin = (index as f64 * span / self.bar_count as f64).floor() as usize;
        bin.min(bins - 1)
    }
}

/// Colour keyed off the raw magnitude: cool and dim when quiet, hot when loud.
pub fn bar_color(value: u8) -> Rgb {
    let v = value as u16;
    Rgb(
        (60 + v * 195 / 255) as u8,
        (200 - v * 150 / 255) as u8,
        (255 - v * 155 / 255) as u8,
    )
}

/// Clear `surface` and paint one bottom-anchored bar per layout slot.
/// Returns the number of bars painted.
pub fn paint_bars<S: DrawSurface + ?Sized>(
    layout: &BarLayout,
    frequencies: &[u8],
    surface: &mut S,
) -> usize {
    surface.clear();

    let width = surface.width();
    let height = surface.height();
    let layout = layout.fitted(width);
    let bar_width = layout.bar_width(width);
    if frequencies.is_empty() || bar_width <= 0.0 || height <= 0.0 {
        return 0;
    }

    for i in 0..layout.bar_count {
        let value = frequencies[layout.bin_for_bar(i, frequencies.len())];
        let bar_height = value as f64 / MAX_MAGNITUDE as f64 * height;
        let x = i as f64 * (bar_width + layout.bar_gap);

        surface.set_fill_style(bar_color(value));
        surface.fill_rect(x, height - bar_height, bar_width, bar_height);
    }
    layout.bar_count
}
