//! Static night sky behind the show: twinkling stars and light snow.
//!
//! Positions are in logical units, same as the simulation.

use crate::point::{Point, Viewport};
use crate::sim::entity::range;
use fastrand::Rng;
use noise::{NoiseFn, Perlin};

/// Logical area per star.
const STAR_DENSITY: f32 = 8000.0;
/// Stars only appear in the top part of the sky.
const STAR_BAND: f32 = 0.7;
const STAR_MIN_ALPHA: f32 = 0.1;
const STAR_MAX_ALPHA: f32 = 0.8;

/// Logical width per snowflake.
const SNOW_SPACING: f32 = 15.0;
const SWAY: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Point,
    pub size: f32,
    base_alpha: f32,
    /// Noise-space cycles per second
    twinkle: f64,
}

impl Star {
    /// Brightness weight of the star's size: the largest stars shine fully.
    pub fn glow(&self) -> f32 {
        (0.5 + self.size / 4.0).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Flake {
    pub pos: Point,
    pub size: f32,
    pub alpha: f32,
    vx: f32,
    vy: f32,
}

impl Flake {
    /// Opacity drawn for this flake; bigger flakes cover more of a pixel.
    pub fn opacity(&self) -> f32 {
        (self.alpha * self.size / 2.0).min(1.0)
    }
}

pub struct Sky {
    viewport: Viewport,
    stars: Vec<Star>,
    flakes: Vec<Flake>,
    noise: Perlin,
    time: f64,
}

impl Sky {
    pub fn new(viewport: Viewport, rng: &mut Rng) -> Self {
        let star_count = (viewport.width * viewport.height / STAR_DENSITY).max(0.0) as usize;
        let stars = (0..star_count)
            .map(|_| Star {
                pos: Point::new(
                    range(rng, 0.0, viewport.width),
                    range(rng, 0.0, viewport.height * STAR_BAND),
                ),
                size: range(rng, 0.5, 2.0),
                base_alpha: range(rng, 0.3, 0.8),
                twinkle: f64::from(range(rng, 0.3, 1.2)),
            })
            .collect();

        let flake_count = (viewport.width / SNOW_SPACING).max(0.0) as usize;
        let flakes = (0..flake_count)
            .map(|_| Flake {
                pos: Point::new(
                    range(rng, 0.0, viewport.width),
                    range(rng, 0.0, viewport.height),
                ),
                size: range(rng, 1.0, 3.0),
                alpha: range(rng, 0.1, 0.4),
                vx: range(rng, -0.15, 0.15),
                vy: range(rng, 0.2, 0.7),
            })
            .collect();

        log::debug!(
            "Sky with {star_count} stars and {flake_count} flakes for {}x{}",
            viewport.width,
            viewport.height
        );

        Self {
            viewport,
            stars,
            flakes,
            noise: Perlin::new(rng.u32(..)),
            time: 0.0,
        }
    }

    /// Moves snow by one tick. Flakes leaving the bottom re-enter at the top.
    pub fn advance(&mut self, dt: f32, rng: &mut Rng) {
        self.time += f64::from(dt);
        let (w, h) = (self.viewport.width, self.viewport.height);

        for flake in &mut self.flakes {
            flake.pos.y += flake.vy;
            flake.pos.x += flake.vx;
            flake.pos.x += (self.time as f32 + flake.pos.y * 0.01).sin() * SWAY;

            if flake.pos.y > h {
                flake.pos.y = -5.0;
                flake.pos.x = range(rng, 0.0, w);
            }
            if flake.pos.x > w {
                flake.pos.x = 0.0;
            } else if flake.pos.x < 0.0 {
                flake.pos.x = w;
            }
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    /// Current brightness of `star`, always within 0.1..=0.8.
    pub fn star_alpha(&self, star: &Star) -> f32 {
        let n = self.noise.get([
            f64::from(star.pos.x) * 0.05,
            f64::from(star.pos.y) * 0.05 + self.time * star.twinkle,
        ]) as f32;
        (star.base_alpha + n * 0.3).clamp(STAR_MIN_ALPHA, STAR_MAX_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1000.0, 800.0);

    #[test]
    fn density_follows_viewport() {
        let sky = Sky::new(VIEW, &mut Rng::with_seed(3));
        assert_eq!(sky.stars().len(), 100);
        assert_eq!(sky.flakes().len(), 66);
    }

    #[test]
    fn stars_stay_in_upper_sky() {
        let sky = Sky::new(VIEW, &mut Rng::with_seed(3));
        for star in sky.stars() {
            assert!(star.pos.y < VIEW.height * STAR_BAND);
            let a = sky.star_alpha(star);
            assert!((STAR_MIN_ALPHA..=STAR_MAX_ALPHA).contains(&a));
        }
    }

    #[test]
    fn snow_wraps_inside_viewport() {
        let mut rng = Rng::with_seed(3);
        let mut sky = Sky::new(VIEW, &mut rng);
        for _ in 0..5000 {
            sky.advance(1.0 / 60.0, &mut rng);
        }
        for flake in sky.flakes() {
            assert!((-5.0..=VIEW.height).contains(&flake.pos.y));
            assert!((0.0..=VIEW.width).contains(&flake.pos.x));
        }
    }

    #[test]
    fn size_scales_brightness() {
        let sky = Sky::new(VIEW, &mut Rng::with_seed(5));
        for star in sky.stars() {
            assert!((0.5..=1.0).contains(&star.glow()));
        }
        for flake in sky.flakes() {
            let expected = flake.alpha * flake.size / 2.0;
            assert!((flake.opacity() - expected).abs() < 1e-6);
            assert!(flake.opacity() <= 1.0);
        }

        let big = Flake {
            pos: Point::default(),
            size: 3.0,
            alpha: 0.4,
            vx: 0.0,
            vy: 0.0,
        };
        let small = Flake { size: 1.0, ..big.clone() };
        assert!(big.opacity() > small.opacity());
    }

    #[test]
    fn tiny_viewport_has_empty_sky() {
        let sky = Sky::new(Viewport::new(10.0, 10.0), &mut Rng::with_seed(3));
        assert!(sky.stars().is_empty());
        assert!(sky.flakes().is_empty());
    }
}
