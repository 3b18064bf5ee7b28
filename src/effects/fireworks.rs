use super::Effect;
use super::backdrop::Sky;
use super::canvas::{self, Canvas, Color, Rgb, WHITE, hsl};
use super::hud::Hud;
use crate::collab::Audio;
use crate::config::ShowConfig;
use crate::point::{Point, Viewport};
use crate::sim::Show;
use crate::sim::entity::Spark;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use fastrand::Rng;
use std::io::Write;

/// Share of the way back to the background each pixel moves per tick.
const TRAIL_FADE: f32 = 0.2;
const SPARKLE_CHANCE: f32 = 0.05;

/// How logical show units map onto the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display {
    /// Logical units per sub-pixel
    pub scale: f32,
    pub background: Rgb,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            scale: 8.0,
            background: (0, 0, 0),
        }
    }
}

pub struct FireworksEffect<A: Audio> {
    show: Show<A, Hud>,
    display: Display,
    width: usize,
    height: usize,
    canvas: Canvas,
    sky: Sky,
    star_layer: Vec<f32>,
    // Cosmetic randomness, kept apart from the show's own generator
    rng: Rng,
    output_buf: Vec<u8>,
}

fn viewport_for(width: usize, height: usize, scale: f32) -> Viewport {
    Viewport::new(width as f32 * scale, height as f32 * scale)
}

/// Converts a logical shake offset into whole sub-pixels. Any non-zero
/// offset moves the frame by at least one sub-pixel.
fn shake_pixels(offset: (f32, f32), scale: f32) -> (isize, isize) {
    let axis = |v: f32| {
        if v == 0.0 {
            0
        } else {
            ((v / scale).abs().round().max(1.0) * v.signum()) as isize
        }
    };
    (axis(offset.0), axis(offset.1))
}

impl<A: Audio> FireworksEffect<A> {
    /// `width` and `height` are in sub-pixels. A `seed` makes the whole show repeatable.
    pub fn new(
        config: ShowConfig,
        audio: A,
        display: Display,
        seed: Option<u64>,
        width: usize,
        height: usize,
    ) -> Self {
        let mut rng = seed.map_or_else(Rng::new, Rng::with_seed);
        let viewport = viewport_for(width, height, display.scale);
        let show = Show::with_rng(config, viewport, audio, Hud::default(), rng.fork());
        let sky = Sky::new(viewport, &mut rng);

        Self {
            show,
            display,
            width,
            height,
            canvas: Canvas::new(width, height, display.background),
            sky,
            star_layer: vec![0.0; width * height],
            rng,
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn show(&self) -> &Show<A, Hud> {
        &self.show
    }

    /// Logical point at the center of terminal cell (`column`, `row`).
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        let s = self.display.scale;
        Point::new(
            (f32::from(column) + 0.5) * s,
            (f32::from(row) * 2.0 + 1.0) * s,
        )
    }

    fn toggle_pause(&mut self) {
        if self.show.is_paused() {
            self.show.resume();
        } else {
            self.show.pause();
        }
    }

    /// Fades the canvas and draws snow and every live entity onto it.
    fn paint(&mut self) {
        let s = self.display.scale;
        let px = |p: Point| (p.x / s, p.y / s);
        let canvas = &mut self.canvas;

        canvas.fade(TRAIL_FADE);

        for flake in self.sky.flakes() {
            let (x, y) = px(flake.pos);
            canvas.blend(x, y, WHITE, flake.opacity());
        }

        for rocket in self.show.pool().projectiles() {
            let color = hsl(rocket.hue, 1.0, rocket.brightness / 100.0);
            let tail = px(rocket.trail.oldest().unwrap_or(rocket.origin));
            let head = px(rocket.pos);
            canvas.line(tail, head, color, 1.0);
            if rocket.finale {
                canvas.line((tail.0 + 1.0, tail.1), (head.0 + 1.0, head.1), color, 0.6);
            }
            canvas.blend(head.0, head.1, hsl(rocket.hue, 1.0, 0.8), 1.0);
        }

        for spark in self.show.pool().sparks() {
            let head = spark.position();
            match spark {
                Spark::Plain(p) => {
                    let color = hsl(p.hue, 1.0, p.brightness / 100.0);
                    let tail = px(p.trail.oldest().unwrap_or(head));
                    canvas.line(tail, px(head), color, p.alpha);
                }
                Spark::Text(p) => {
                    let (x, y) = px(head);
                    canvas.blend(x, y, hsl(p.hue, 1.0, 0.7), p.alpha);
                    if self.rng.f32() < SPARKLE_CHANCE {
                        canvas.blend(x, y, WHITE, p.alpha);
                    }
                }
            }
        }
    }

    fn build_star_layer(&mut self) {
        self.star_layer.fill(0.0);
        let s = self.display.scale;
        for star in self.sky.stars() {
            let (x, y) = ((star.pos.x / s) as usize, (star.pos.y / s) as usize);
            if x < self.width && y < self.height {
                let idx = y * self.width + x;
                let alpha = self.sky.star_alpha(star) * star.glow();
                self.star_layer[idx] = self.star_layer[idx].max(alpha);
            }
        }
    }

    /// Final color of sub-pixel (`x`, `y`): the shaken canvas with stars behind it.
    fn pixel(&self, x: usize, y: usize, shake: (isize, isize)) -> Rgb {
        let sx = x as isize - shake.0;
        let sy = y as isize - shake.1;
        let mut color = if sx >= 0 && sy >= 0 {
            self.canvas.get(sx as usize, sy as usize)
        } else {
            self.canvas.background()
        };

        let star = self.star_layer[y * self.width + x];
        if star > 0.0 {
            let bg = self.canvas.background();
            let lit: Color = std::array::from_fn(|i| bg[i] + (1.0 - bg[i]) * star);
            for (c, l) in color.iter_mut().zip(lit) {
                *c = c.max(l);
            }
        }
        canvas::to_rgb(color)
    }
}

impl<A: Audio> Effect for FireworksEffect<A> {
    fn update(&mut self, dt: f32) {
        self.show.tick(dt);
        if !self.show.is_paused() {
            self.sky.advance(dt, &mut self.rng);
        }
        self.paint();
    }

    fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.build_star_layer();

        let mut buf = std::mem::take(&mut self.output_buf);
        buf.clear();
        buf.extend_from_slice(b"\x1b[H");

        let shake = shake_pixels(self.show.shake().offset(), self.display.scale);

        let mut prev_top_color: Rgb = (255, 255, 255);
        let mut prev_bot_color: Rgb = (255, 255, 255);

        // Render using half-blocks
        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top_color = self.pixel(x, y, shake);
                let bot_color = if y + 1 < self.height {
                    self.pixel(x, y + 1, shake)
                } else {
                    top_color
                };

                if top_color != prev_top_color {
                    write!(
                        buf,
                        "\x1b[48;2;{};{};{}m",
                        top_color.0, top_color.1, top_color.2
                    )?;
                    prev_top_color = top_color;
                }
                if bot_color != prev_bot_color {
                    write!(
                        buf,
                        "\x1b[38;2;{};{};{}m",
                        bot_color.0, bot_color.1, bot_color.2
                    )?;
                    prev_bot_color = bot_color;
                }

                buf.extend_from_slice("▄".as_bytes());
            }
            buf.extend_from_slice(b"\x1b[0m");
            prev_top_color = (255, 255, 255);
            prev_bot_color = (255, 255, 255);
            if y + 2 < self.height {
                buf.extend_from_slice(b"\r\n");
            }
        }

        self.show.overlay().render(
            &mut buf,
            self.width,
            self.height.div_ceil(2),
            self.display.background,
            self.show.is_paused(),
        )?;

        out.write_all(&buf)?;
        out.flush()?;
        self.output_buf = buf;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                let at = self.cell_center(mouse.column, mouse.row);
                self.show.tap(at);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('p') => {
                self.toggle_pause();
            }
            Event::FocusLost => self.show.pause(),
            Event::FocusGained => self.show.resume(),
            _ => {}
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let viewport = viewport_for(width, height, self.display.scale);
        self.show.resize(viewport);
        self.sky = Sky::new(viewport, &mut self.rng);
        self.canvas = Canvas::new(width, height, self.display.background);
        self.star_layer = vec![0.0; width * height];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::Silent;
    use crate::sim::sequencer::Phase;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent};

    fn effect() -> FireworksEffect<Silent> {
        FireworksEffect::new(
            ShowConfig::default(),
            Silent,
            Display::default(),
            Some(11),
            80,
            48,
        )
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn viewport_is_scaled_sub_pixels() {
        let fx = effect();
        assert_eq!(fx.show().viewport(), Viewport::new(640.0, 384.0));
        assert_eq!(fx.cell_center(0, 0), Point::new(4.0, 8.0));
        assert_eq!(fx.cell_center(10, 3), Point::new(84.0, 56.0));
    }

    #[test]
    fn click_launches_a_rocket() {
        let mut fx = effect();
        fx.handle_event(&click(40, 5));
        assert_eq!(fx.show().sequencer().total_clicks(), 1);
        assert_eq!(fx.show().pool().projectiles().len(), 1);
        assert_eq!(fx.show().phase(), Phase::Warmup);
    }

    #[test]
    fn focus_and_key_pause() {
        let mut fx = effect();
        fx.handle_event(&Event::FocusLost);
        assert!(fx.show().is_paused());
        fx.handle_event(&Event::FocusGained);
        assert!(!fx.show().is_paused());

        let p = Event::Key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE));
        fx.handle_event(&p);
        assert!(fx.show().is_paused());
        fx.handle_event(&click(40, 5));
        assert_eq!(fx.show().sequencer().total_clicks(), 0);
        fx.handle_event(&p);
        assert!(!fx.show().is_paused());
    }

    #[test]
    fn render_draws_every_cell() {
        let mut fx = effect();
        fx.handle_event(&click(40, 5));
        for _ in 0..30 {
            fx.update(1.0 / 60.0);
        }
        let mut out = Vec::new();
        fx.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert_eq!(text.matches('▄').count(), 80 * 24);
    }

    #[test]
    fn rocket_leaves_light_on_canvas() {
        let mut fx = effect();
        fx.handle_event(&click(40, 5));
        fx.update(1.0 / 60.0);
        let lit = (0..fx.height)
            .flat_map(|y| (0..fx.width).map(move |x| (x, y)))
            .any(|(x, y)| fx.canvas.get(x, y) != fx.canvas.background());
        assert!(lit);
    }

    #[test]
    fn shake_is_scaled_to_sub_pixels() {
        assert_eq!(shake_pixels((0.0, 0.0), 8.0), (0, 0));
        assert_eq!(shake_pixels((3.0, -2.0), 8.0), (1, -1));
        assert_eq!(shake_pixels((16.4, -24.0), 8.0), (2, -3));
        assert_eq!(shake_pixels((2.6, 0.0), 1.0), (3, 0));
    }

    #[test]
    fn resize_keeps_the_show() {
        let mut fx = effect();
        fx.handle_event(&click(40, 5));
        fx.resize(100, 60);
        assert_eq!(fx.show().viewport(), Viewport::new(800.0, 480.0));
        assert_eq!(fx.show().sequencer().total_clicks(), 1);
        assert_eq!(fx.canvas.width(), 100);
        assert_eq!(fx.canvas.height(), 60);
    }
}
