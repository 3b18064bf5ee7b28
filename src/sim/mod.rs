//! The simulation context: everything that changes from tick to tick.

pub mod entity;
pub mod pool;
pub mod sequencer;
pub mod trail;

use crate::collab::{Audio, Overlay};
use crate::config::ShowConfig;
use crate::point::{Point, Viewport};
use crate::raster;
use entity::range;
use fastrand::Rng;
use pool::{EntityPool, TEXT_FADE};
use sequencer::{Cue, Phase, Sequencer};

/// Seconds per simulation tick. Entity physics constants assume this rate.
pub const TICK: f32 = 1.0 / 60.0;

/// Shake magnitude of one plain burst.
const BURST_SHAKE: f32 = 3.0;
const SHAKE_DECAY: f32 = 0.85;
const SHAKE_CUTOFF: f32 = 0.5;

/// Horizontal jitter of the launch point around the bottom center.
const LAUNCH_SPREAD: f32 = 200.0;
/// Spacing between the launch points of one text's finale rockets.
const FINALE_SPACING: f32 = 100.0;

/// Screen-shake pulse, applied to the whole surface by the renderer.
///
/// The offset is in logical units; renderers divide it by their scale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shake {
    intensity: f32,
    offset: (f32, f32),
}

impl Shake {
    pub fn pulse(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    /// Picks this tick's offset and weakens the shake.
    pub fn decay(&mut self, rng: &mut Rng) {
        if self.intensity <= 0.0 {
            return;
        }
        self.offset = (
            range(rng, -1.0, 1.0) * self.intensity,
            range(rng, -1.0, 1.0) * self.intensity,
        );
        self.intensity *= SHAKE_DECAY;
        if self.intensity < SHAKE_CUTOFF {
            self.intensity = 0.0;
            self.offset = (0.0, 0.0);
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }
}

/// One running show: entities, script, clock and the collaborators it drives.
pub struct Show<A: Audio, O: Overlay> {
    config: ShowConfig,
    viewport: Viewport,
    pool: EntityPool,
    sequencer: Sequencer,
    shake: Shake,
    clock: f64,
    paused: bool,
    rng: Rng,
    audio: A,
    overlay: O,
    cues: Vec<Cue>,
}

impl<A: Audio, O: Overlay> Show<A, O> {
    pub fn new(config: ShowConfig, viewport: Viewport, audio: A, overlay: O) -> Self {
        Self::with_rng(config, viewport, audio, overlay, Rng::new())
    }

    /// Same as [`Show::new`] but every random draw comes from `rng`.
    pub fn with_rng(
        config: ShowConfig,
        viewport: Viewport,
        audio: A,
        mut overlay: O,
        rng: Rng,
    ) -> Self {
        overlay.show_hint(&config.intro_hint);
        overlay.set_wish_progress(0, config.wishes.len());

        Self {
            sequencer: Sequencer::new(&config),
            config,
            viewport,
            pool: EntityPool::new(),
            shake: Shake::default(),
            clock: 0.0,
            paused: false,
            rng,
            audio,
            overlay,
            cues: Vec::new(),
        }
    }

    /// A tap or click at viewport coordinates.
    pub fn tap(&mut self, at: Point) {
        if self.paused {
            log::debug!("Ignoring tap at {at:?} while paused");
            return;
        }
        let mut cues = std::mem::take(&mut self.cues);
        self.sequencer.tap(self.clock, at, &mut cues);
        self.apply(&mut cues);
        self.cues = cues;
    }

    /// Advances the show by one fixed step of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.clock += f64::from(dt);

        let mut cues = std::mem::take(&mut self.cues);
        self.sequencer.poll(self.clock, &mut cues);
        self.apply(&mut cues);
        self.cues = cues;

        let report = self.pool.advance_all(&mut self.rng);
        if report.text_bursts > 0 {
            log::debug!("{} text bursts at t={:.3}", report.text_bursts, self.clock);
        }
        for _ in 0..report.explosions {
            self.audio.play_explosion();
            self.shake.pulse(BURST_SHAKE);
        }

        self.shake.decay(&mut self.rng);
    }

    /// Stops the show and drops every entity in flight.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        log::info!("Paused at t={:.3}", self.clock);
        self.paused = true;
        self.pool.clear();
        self.shake = Shake::default();
        self.sequencer.suspend();
        self.audio.pause_background_music();
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        log::info!("Resumed at t={:.3}", self.clock);
        self.paused = false;
        self.sequencer.resume(self.clock);
        if self.sequencer.music_started() {
            self.audio.resume_background_music();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
    }

    fn apply(&mut self, cues: &mut Vec<Cue>) {
        for cue in cues.drain(..) {
            match cue {
                Cue::LaunchSound => self.audio.play_launch(),
                Cue::ClickCount(total) => self.overlay.set_click_count(total),
                Cue::WarmupRocket(at) => {
                    let h = self.viewport.height;
                    let target = Point::new(
                        at.x,
                        at.y - h * 0.15 + range(&mut self.rng, -h * 0.05, h * 0.05),
                    );
                    let origin = self.launch_origin();
                    self.pool
                        .spawn_projectile(origin, target, false, None, &mut self.rng);
                }
                Cue::FreeRocket(at) => {
                    let origin = self.launch_origin();
                    self.pool.spawn_projectile(origin, at, true, None, &mut self.rng);
                }
                Cue::LaunchText(text) => self.launch_text(&text),
                Cue::FadeText => {
                    let faded = self.pool.fade_text(TEXT_FADE);
                    log::debug!("Fading {faded} text particles");
                }
                Cue::StartMusic => self.audio.play_background_music(),
                Cue::ShowHint(text) => self.overlay.show_hint(&text),
                Cue::HideHint => self.overlay.hide_hint(),
                Cue::RevealClickCount => self.overlay.reveal_click_count(),
                Cue::WishProgress { shown, total } => self.overlay.set_wish_progress(shown, total),
                Cue::ShowCredits => self
                    .overlay
                    .show_credits(&self.config.credits_text, self.config.credits_link.as_deref()),
            }
        }
    }

    fn launch_origin(&mut self) -> Point {
        Point::new(
            self.viewport.width / 2.0 + range(&mut self.rng, -LAUNCH_SPREAD, LAUNCH_SPREAD),
            self.viewport.height,
        )
    }

    /// Splits the x-sorted point cloud of `text` into contiguous chunks and
    /// sends one finale rocket per non-empty chunk to the chunk's centroid.
    fn launch_text(&mut self, text: &str) {
        let mut points = raster::rasterize(text, self.viewport);
        if points.is_empty() {
            log::debug!("Nothing to draw for {text:?}");
            return;
        }
        points.sort_by(|a, b| a.x.total_cmp(&b.x));

        let rockets = self.config.rockets_per_text;
        let chunk_size = points.len().div_ceil(rockets);
        let mid = rockets as f32 / 2.0;

        for (i, chunk) in points.chunks(chunk_size).enumerate() {
            let n = chunk.len() as f32;
            let centroid = Point::new(
                chunk.iter().map(|p| p.x).sum::<f32>() / n,
                chunk.iter().map(|p| p.y).sum::<f32>() / n,
            );
            let origin = Point::new(
                self.viewport.width / 2.0 + (i as f32 - mid) * FINALE_SPACING,
                self.viewport.height,
            );
            self.pool
                .spawn_projectile(origin, centroid, true, Some(chunk.to_vec()), &mut self.rng);
        }
        log::info!(
            "Launched {:?} as {} points on {} rockets",
            text,
            points.len(),
            points.len().div_ceil(chunk_size)
        );
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn shake(&self) -> &Shake {
        &self.shake
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds of unpaused simulation so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_decays_to_zero() {
        let mut rng = Rng::with_seed(9);
        let mut shake = Shake::default();
        shake.pulse(BURST_SHAKE);

        let (dx, dy) = {
            shake.decay(&mut rng);
            shake.offset()
        };
        assert!(dx.abs() <= BURST_SHAKE && dy.abs() <= BURST_SHAKE);
        assert!((shake.intensity() - BURST_SHAKE * SHAKE_DECAY).abs() < 1e-6);

        let mut ticks = 1;
        while shake.intensity() > 0.0 {
            shake.decay(&mut rng);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(shake.offset(), (0.0, 0.0));
        // 3 * 0.85^11 is the first value below 0.5
        assert_eq!(ticks, 12);
    }

    #[test]
    fn idle_shake_stays_still() {
        let mut rng = Rng::with_seed(9);
        let mut shake = Shake::default();
        shake.decay(&mut rng);
        assert_eq!(shake, Shake::default());
    }
}
