//! Persistent RGB surface the show is painted on.
//!
//! Nothing is cleared between ticks; instead every pixel is pulled a fixed
//! fraction back toward the background, which leaves motion trails.

pub type Rgb = (u8, u8, u8);

/// Linear 0..=1 channels.
pub type Color = [f32; 3];

pub const WHITE: Color = [1.0, 1.0, 1.0];

/// Longest line the rasterizer will walk, in pixels.
const MAX_LINE_STEPS: f32 = 4096.0;

/// `h` in degrees, `s` and `l` in 0..=1.
pub fn hsl(h: f32, s: f32, l: f32) -> Color {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

pub fn to_rgb(c: Color) -> Rgb {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    (q(c[0]), q(c[1]), q(c[2]))
}

pub fn from_rgb(c: Rgb) -> Color {
    [c.0 as f32 / 255.0, c.1 as f32 / 255.0, c.2 as f32 / 255.0]
}

pub struct Canvas {
    width: usize,
    height: usize,
    background: Color,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        let background = from_rgb(background);
        Self {
            width,
            height,
            background,
            pixels: vec![background; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Moves every pixel `amount` of the way back to the background.
    pub fn fade(&mut self, amount: f32) {
        let bg = self.background;
        for px in &mut self.pixels {
            for (c, b) in px.iter_mut().zip(bg) {
                *c += (b - *c) * amount;
            }
        }
    }

    /// Source-over blend of one pixel. Off-canvas coordinates are ignored.
    pub fn blend(&mut self, x: f32, y: f32, color: Color, alpha: f32) {
        if !(x >= 0.0 && y >= 0.0) {
            return;
        }
        let (xi, yi) = (x as usize, y as usize);
        if xi >= self.width || yi >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let px = &mut self.pixels[yi * self.width + xi];
        for (c, s) in px.iter_mut().zip(color) {
            *c += (s - *c) * a;
        }
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, alpha: f32) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs()).ceil().clamp(1.0, MAX_LINE_STEPS);
        if !steps.is_finite() {
            return;
        }
        let steps = steps as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.blend(from.0 + dx * t, from.1 + dy * t, color, alpha);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            self.background
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(to_rgb(hsl(0.0, 1.0, 0.5)), (255, 0, 0));
        assert_eq!(to_rgb(hsl(120.0, 1.0, 0.5)), (0, 255, 0));
        assert_eq!(to_rgb(hsl(240.0, 1.0, 0.5)), (0, 0, 255));
        assert_eq!(to_rgb(hsl(360.0, 1.0, 0.5)), (255, 0, 0));
        assert_eq!(to_rgb(hsl(45.0, 1.0, 1.0)), (255, 255, 255));
        assert_eq!(to_rgb(hsl(200.0, 0.0, 0.0)), (0, 0, 0));
    }

    #[test]
    fn gold_is_orange_yellow() {
        let (r, g, b) = to_rgb(hsl(45.0, 1.0, 0.5));
        assert_eq!((r, b), (255, 0));
        assert!((185..=195).contains(&g), "green {g}");
    }

    #[test]
    fn fade_returns_to_background() {
        let mut canvas = Canvas::new(2, 2, (10, 20, 30));
        canvas.blend(0.5, 0.5, WHITE, 1.0);
        assert_eq!(to_rgb(canvas.get(0, 0)), (255, 255, 255));

        for _ in 0..60 {
            canvas.fade(0.2);
        }
        assert_eq!(to_rgb(canvas.get(0, 0)), (10, 20, 30));
    }

    #[test]
    fn blend_ignores_off_canvas() {
        let mut canvas = Canvas::new(3, 3, (0, 0, 0));
        canvas.blend(-1.0, 1.0, WHITE, 1.0);
        canvas.blend(1.0, 3.0, WHITE, 1.0);
        canvas.blend(f32::NAN, 1.0, WHITE, 1.0);
        assert!((0..3).all(|y| (0..3).all(|x| canvas.get(x, y) == [0.0; 3])));
    }

    #[test]
    fn line_covers_both_ends() {
        let mut canvas = Canvas::new(10, 10, (0, 0, 0));
        canvas.line((1.0, 1.0), (8.0, 5.0), WHITE, 1.0);
        assert_eq!(canvas.get(1, 1), WHITE);
        assert_eq!(canvas.get(8, 5), WHITE);
        assert_eq!(canvas.get(9, 9), [0.0; 3]);
    }
}
