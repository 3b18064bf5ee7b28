//! Text to point-cloud rasterizer.
//!
//! Renders a string off-screen into an alpha buffer the size of the viewport,
//! shrinking the font until the text fits, then samples the buffer on a fixed
//! stride. The resulting points are the targets text particles fly to.

pub mod font;

use crate::point::{Point, Viewport};
use font::{GLYPH_COLS, GLYPH_ROWS, glyph};

/// Distance between samples, in pixels, on both axes.
pub const STRIDE: usize = 3;
/// Samples brighter than this become points.
const ALPHA_THRESHOLD: u8 = 128;

const MAX_WIDTH_RATIO: f32 = 0.85;
const MAX_HEIGHT_RATIO: f32 = 0.7;
const LINE_HEIGHT_RATIO: f32 = 1.2;
/// The text block is centered on this fraction of the viewport height.
const CENTER_RATIO: f32 = 0.4;

/// Edge of one glyph cell relative to the font size.
const CELL_RATIO: f32 = 0.1;
/// Horizontal advance per character, in cells (glyph plus one blank column).
const ADVANCE_CELLS: f32 = (GLYPH_COLS + 1) as f32;

/// Where the text block lands for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub font_size: f32,
    pub line_height: f32,
    /// Vertical center of the first line
    pub first_line_y: f32,
}

/// Rendered width of a single line at `font_size`.
pub fn measure_line(line: &str, font_size: f32) -> f32 {
    let chars = line.chars().count();
    if chars == 0 {
        return 0.0;
    }
    let cell = font_size * CELL_RATIO;
    chars as f32 * ADVANCE_CELLS * cell - cell
}

/// Picks the font size so the text fits 85% of the width and 70% of the
/// height, starting from a sixth of the viewport width.
pub fn layout(text: &str, viewport: Viewport) -> Layout {
    let line_count = text.split('\n').count() as f32;
    let mut font_size = viewport.width / 6.0;

    let widest = text
        .split('\n')
        .map(|line| measure_line(line, font_size))
        .fold(0.0, f32::max);
    let max_width = viewport.width * MAX_WIDTH_RATIO;
    if widest > max_width {
        font_size *= max_width / widest;
    }

    let max_height = viewport.height * MAX_HEIGHT_RATIO;
    let total_height = font_size * LINE_HEIGHT_RATIO * line_count;
    if total_height > max_height {
        font_size *= max_height / total_height;
    }

    let line_height = font_size * LINE_HEIGHT_RATIO;
    let block_height = line_height * line_count;
    let first_line_y =
        (viewport.height * CENTER_RATIO - block_height / 2.0 + line_height / 2.0).max(line_height);

    Layout {
        font_size,
        line_height,
        first_line_y,
    }
}

/// Converts `text` into the points covered by its glyphs.
///
/// Points come out row by row; callers that need spatial order sort them.
/// Text without any drawable character yields no points.
pub fn rasterize(text: &str, viewport: Viewport) -> Vec<Point> {
    let width = viewport.width.max(0.0) as usize;
    let height = viewport.height.max(0.0) as usize;
    if width == 0 || height == 0 || text.chars().all(|c| glyph(c).is_none()) {
        return Vec::new();
    }

    let layout = layout(text, viewport);
    let mut canvas = AlphaCanvas::new(width, height);
    for (i, line) in text.split('\n').enumerate() {
        let center_y = layout.first_line_y + i as f32 * layout.line_height;
        canvas.draw_line(line, viewport.width / 2.0, center_y, layout.font_size);
    }

    let points = canvas.sample(STRIDE, ALPHA_THRESHOLD);
    log::debug!(
        "Rasterized {:?} at font size {:.1}: {} points",
        text,
        layout.font_size,
        points.len()
    );
    points
}

/// Off-screen coverage buffer, one byte of alpha per pixel.
struct AlphaCanvas {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl AlphaCanvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    /// Draws `line` horizontally centered on `center_x`, vertically centered on `center_y`.
    fn draw_line(&mut self, line: &str, center_x: f32, center_y: f32, font_size: f32) {
        let cell = font_size * CELL_RATIO;
        let left = center_x - measure_line(line, font_size) / 2.0;
        let top = center_y - GLYPH_ROWS as f32 * cell / 2.0;

        for (i, c) in line.chars().enumerate() {
            let Some(bits) = glyph(c) else {
                continue;
            };
            let x = left + i as f32 * ADVANCE_CELLS * cell;
            for (row, &row_bits) in bits.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if row_bits >> (GLYPH_COLS - 1 - col) & 1 == 1 {
                        let x0 = x + col as f32 * cell;
                        let y0 = top + row as f32 * cell;
                        self.fill_rect(x0, y0, x0 + cell, y0 + cell);
                    }
                }
            }
        }
    }

    /// Adds exact area coverage of the rectangle to every pixel it touches.
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        if x1 <= 0.0 || y1 <= 0.0 {
            return;
        }
        let px0 = x0.max(0.0).floor() as usize;
        let py0 = y0.max(0.0).floor() as usize;
        let px1 = (x1.ceil() as usize).min(self.width);
        let py1 = (y1.ceil() as usize).min(self.height);

        for py in py0..py1 {
            let cover_y = (y1.min(py as f32 + 1.0) - y0.max(py as f32)).max(0.0);
            if cover_y == 0.0 {
                continue;
            }
            for px in px0..px1 {
                let cover_x = (x1.min(px as f32 + 1.0) - x0.max(px as f32)).max(0.0);
                let add = (cover_x * cover_y * 255.0).round() as u8;
                let idx = py * self.width + px;
                self.alpha[idx] = self.alpha[idx].saturating_add(add);
            }
        }
    }

    fn sample(&self, stride: usize, threshold: u8) -> Vec<Point> {
        let mut points = Vec::new();
        for y in (0..self.height).step_by(stride) {
            for x in (0..self.width).step_by(stride) {
                if self.alpha[y * self.width + x] > threshold {
                    points.push(Point::new(x as f32, y as f32));
                }
            }
        }
        points
    }
}
