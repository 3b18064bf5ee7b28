//! Rockets and the sparks they burst into.
//!
//! All constants are per tick: one tick is one display refresh (1/60 s), and
//! distances are logical viewport units.

use super::trail::Trail;
use crate::point::Point;
use fastrand::Rng;
use std::f32::consts::TAU;

pub const LAUNCH_SPEED: f32 = 18.0;
const ROCKET_DRAG: f32 = 0.99;
const ROCKET_GRAVITY: f32 = 0.02;
/// Vertical speed (downward) at which a rocket bursts even short of its target.
pub const STALL_VELOCITY: f32 = 3.0;
const ROCKET_TRAIL: usize = 3;

/// Hue of finale rockets and the text they form (gold).
pub const FINALE_HUE: f32 = 45.0;

const SPARK_FRICTION: f32 = 0.95;
const SPARK_GRAVITY: f32 = 0.05;
const SPARK_TRAIL: usize = 5;

const GLYPH_FRICTION: f32 = 0.92;
const GLYPH_SPRING: f32 = 0.05;

/// Uniform sample in `[min, max)`.
pub(crate) fn range(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub origin: Point,
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub target: Point,
    /// Path length covered since launch
    pub traveled: f32,
    /// Straight-line distance from origin to target
    pub target_distance: f32,
    pub hue: f32,
    pub brightness: f32,
    pub trail: Trail,
    pub finale: bool,
    pub payload: Option<Vec<Point>>,
}

impl Projectile {
    /// A rocket leaving `origin` aimed straight at `target`.
    pub fn launch(
        origin: Point,
        target: Point,
        finale: bool,
        payload: Option<Vec<Point>>,
        rng: &mut Rng,
    ) -> Self {
        let angle = (target.y - origin.y).atan2(target.x - origin.x);
        let hue = if finale {
            FINALE_HUE
        } else {
            range(rng, 0.0, 360.0)
        };

        Self {
            origin,
            pos: origin,
            vx: angle.cos() * LAUNCH_SPEED,
            vy: angle.sin() * LAUNCH_SPEED,
            target,
            traveled: 0.0,
            target_distance: origin.distance(target),
            hue,
            brightness: range(rng, 50.0, 70.0),
            trail: Trail::new(ROCKET_TRAIL, origin),
            finale,
            payload,
        }
    }

    /// Integrates one tick. Returns true once the rocket should burst.
    pub fn advance(&mut self) -> bool {
        self.trail.push(self.pos);

        self.vx *= ROCKET_DRAG;
        self.vy *= ROCKET_DRAG;
        self.vy += ROCKET_GRAVITY;

        let before = self.pos;
        self.pos.x += self.vx;
        self.pos.y += self.vy;
        self.traveled += before.distance(self.pos);

        self.traveled >= self.target_distance || self.vy >= STALL_VELOCITY
    }

    /// True when the burst forms text rather than a plain explosion.
    pub fn carries_text(&self) -> bool {
        self.finale && self.payload.is_some()
    }
}

/// Untargeted burst fragment.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub hue: f32,
    pub brightness: f32,
    pub alpha: f32,
    pub decay: f32,
    pub trail: Trail,
}

impl Particle {
    pub fn burst(at: Point, hue: f32, rng: &mut Rng) -> Self {
        let angle = range(rng, 0.0, TAU);
        let speed = range(rng, 1.0, 17.0);

        Self {
            pos: at,
            vx: angle.cos() * speed * range(rng, 0.5, 1.0),
            vy: angle.sin() * speed * range(rng, 0.5, 1.0),
            hue,
            brightness: range(rng, 50.0, 80.0),
            alpha: 1.0,
            decay: range(rng, 0.008, 0.02),
            trail: Trail::new(SPARK_TRAIL, at),
        }
    }

    /// Integrates one tick. Returns false once the particle should be removed.
    pub fn advance(&mut self) -> bool {
        self.trail.push(self.pos);

        self.vx *= SPARK_FRICTION;
        self.vy *= SPARK_FRICTION;
        self.vy += SPARK_GRAVITY;

        self.pos.x += self.vx;
        self.pos.y += self.vy;

        self.alpha -= self.decay;
        self.alpha > self.decay
    }
}

/// Fragment that springs toward a fixed point of a text silhouette.
#[derive(Debug, Clone)]
pub struct TextParticle {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub target: Point,
    pub hue: f32,
    pub alpha: f32,
    /// Zero until the text is told to fade
    pub decay: f32,
    pub size: f32,
}

impl TextParticle {
    pub fn burst(at: Point, target: Point, hue: f32, rng: &mut Rng) -> Self {
        let angle = range(rng, 0.0, TAU);
        let speed = range(rng, 5.0, 15.0);

        Self {
            pos: at,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            target,
            hue,
            alpha: 1.0,
            decay: 0.0,
            size: range(rng, 1.2, 3.5),
        }
    }

    pub fn advance(&mut self) -> bool {
        self.vx *= GLYPH_FRICTION;
        self.vy *= GLYPH_FRICTION;

        self.vx += (self.target.x - self.pos.x) * GLYPH_SPRING;
        self.vy += (self.target.y - self.pos.y) * GLYPH_SPRING;

        self.pos.x += self.vx;
        self.pos.y += self.vy;

        self.alpha -= self.decay;
        self.alpha > 0.0
    }
}

/// Anything a rocket leaves behind.
#[derive(Debug, Clone)]
pub enum Spark {
    Plain(Particle),
    Text(TextParticle),
}

impl Spark {
    /// Advances one tick; false means the spark has expired.
    pub fn advance(&mut self) -> bool {
        match self {
            Spark::Plain(p) => p.advance(),
            Spark::Text(p) => p.advance(),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Spark::Plain(p) => p.pos,
            Spark::Text(p) => p.pos,
        }
    }
}
