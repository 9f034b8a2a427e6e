// src/audio/visualizer/surface.rs
//! Drawing surfaces the spectrum is painted onto.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

/// 24-bit fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Minimal 2D paint context, measured in surface pixels with the origin at
/// the top-left corner.
pub trait DrawSurface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    fn clear(&mut self);

    fn set_fill_style(&mut self, color: Rgb);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
}

/// Vertical pixels per terminal cell.
pub const SUBROWS_PER_CELL: u16 = 8;

const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Surface over a grid of terminal cells. Each cell is one pixel wide and
/// eight pixels tall, rendered with eighth-block glyphs.
#[derive(Debug, Clone, Default)]
pub struct CellSurface {
    cols: u16,
    rows: u16,
    pixels: Vec<Option<Rgb>>,
    fill: Option<Rgb>,
}

impl CellSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut surface = Self::default();
        surface.resize(cols, rows);
        surface
    }

    /// Match the surface to a terminal area. Resizing drops the current picture.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.pixels = vec![None; cols as usize * (rows * SUBROWS_PER_CELL) as usize];
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn pixel_height(&self) -> usize {
        (self.rows * SUBROWS_PER_CELL) as usize
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.pixels
            .get(y * self.cols as usize + x)
            .copied()
            .flatten()
    }

    #[cfg(test)]
    pub(crate) fn glyph(&self, col: u16, row: u16) -> char {
        self.cell(col, row).0
    }

    /// Glyph and colour for one cell: filled sub-rows become an eighth block.
    fn cell(&self, col: u16, row: u16) -> (char, Option<Rgb>) {
        let top = (row * SUBROWS_PER_CELL) as usize;
        let mut filled = 0;
        let mut color = None;
        for y in top..top + SUBROWS_PER_CELL as usize {
            if let Some(c) = self.pixel(col as usize, y) {
                filled += 1;
                color.get_or_insert(c);
            }
        }
        (EIGHTHS[filled], color)
    }
}

impl DrawSurface for CellSurface {
    fn width(&self) -> f64 {
        self.cols as f64
    }

    fn height(&self) -> f64 {
        self.pixel_height() as f64
    }

    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn set_fill_style(&mut self, color: Rgb) {
        self.fill = Some(color);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let Some(color) = self.fill else {
            return;
        };
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let x0 = x.round().max(0.0) as usize;
        let x1 = ((x + w).round().max(0.0) as usize).min(self.cols as usize);
        let y0 = y.round().max(0.0) as usize;
        let y1 = ((y + h).round().max(0.0) as usize).min(self.pixel_height());
        let stride = self.cols as usize;
        for py in y0..y1 {
            for px in x0..x1 {
                self.pixels[py * stride + px] = Some(color);
            }
        }
    }
}

impl Widget for &CellSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let (glyph, color) = self.cell(col, row);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(glyph);
                    if let Some(Rgb(r, g, b)) = color {
                        cell.set_fg(Color::Rgb(r, g, b));
                    }
                }
            }
        }
    }
}

/// One recorded paint call.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Clear,
    Fill(Rgb),
    Rect { x: f64, y: f64, w: f64, h: f64 },
}

/// Surface that records paint calls instead of drawing.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<PaintOp>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn rects(&self) -> Vec<(f64, f64, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                PaintOp::Rect { x, y, w, h } => Some((x, y, w, h)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl DrawSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(PaintOp::Clear);
    }

    fn set_fill_style(&mut self, color: Rgb) {
        self.ops.push(PaintOp::Fill(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(PaintOp::Rect { x, y, w, h });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_anchored_rect_renders_as_eighths() {
        let mut surface = CellSurface::new(3, 2);
        assert_eq!(surface.height(), 16.0);

        surface.set_fill_style(Rgb(10, 20, 30));
        // 11 pixels tall: one full cell plus three eighths of the one above.
        surface.fill_rect(1.0, 5.0, 1.0, 11.0);

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "█");
        assert_eq!(buf[(1, 0)].symbol(), "▃");
        assert_eq!(buf[(0, 1)].symbol(), " ");
        assert_eq!(buf[(1, 1)].fg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn fill_is_clipped_to_the_surface() {
        let mut surface = CellSurface::new(2, 1);
        surface.set_fill_style(Rgb(1, 1, 1));
        surface.fill_rect(-3.0, -3.0, 50.0, 50.0);
        assert!(surface.pixels.iter().all(Option::is_some));

        surface.clear();
        assert!(surface.pixels.iter().all(Option::is_none));
    }

    #[test]
    fn resize_reallocates() {
        let mut surface = CellSurface::default();
        assert_eq!(surface.width(), 0.0);
        surface.resize(4, 3);
        assert_eq!(surface.size(), (4, 3));
        assert_eq!(surface.pixels.len(), 4 * 24);
    }
}
