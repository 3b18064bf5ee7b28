use super::entity::{Particle, Projectile, Spark, TextParticle};
use crate::point::Point;
use fastrand::Rng;

/// Fragments in one plain burst.
pub const BURST_SIZE: usize = 115;

/// Decay given to text particles when their message should fade away.
pub const TEXT_FADE: f32 = 0.01;

/// What happened during one [`EntityPool::advance_all`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Plain bursts, each wants an explosion sound and a shake
    pub explosions: usize,
    /// Finale rockets that released text particles
    pub text_bursts: usize,
}

/// Owns every live rocket and spark.
#[derive(Debug, Default)]
pub struct EntityPool {
    projectiles: Vec<Projectile>,
    sparks: Vec<Spark>,
    // Reused between ticks to avoid reallocating
    bursting: Vec<Burst>,
}

/// What a finished rocket leaves behind for the spark pass.
#[derive(Debug)]
struct Burst {
    at: Point,
    hue: f32,
    /// Taken out of the rocket, only for finale rockets carrying text
    payload: Option<Vec<Point>>,
}

impl EntityPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_projectile(
        &mut self,
        origin: Point,
        target: Point,
        finale: bool,
        payload: Option<Vec<Point>>,
        rng: &mut Rng,
    ) {
        self.projectiles
            .push(Projectile::launch(origin, target, finale, payload, rng));
    }

    /// Advances rockets, turns finished rockets into sparks, then advances all
    /// sparks (including the new ones) and drops the expired.
    pub fn advance_all(&mut self, rng: &mut Rng) -> TickReport {
        let mut report = TickReport::default();

        let bursting = &mut self.bursting;
        self.projectiles.retain_mut(|rocket| {
            if rocket.advance() {
                let payload = if rocket.carries_text() {
                    rocket.payload.take()
                } else {
                    None
                };
                bursting.push(Burst {
                    at: rocket.pos,
                    hue: rocket.hue,
                    payload,
                });
                false
            } else {
                true
            }
        });

        for burst in self.bursting.drain(..) {
            match burst.payload {
                Some(payload) => {
                    log::trace!("Text burst of {} particles at {:?}", payload.len(), burst.at);
                    self.sparks.extend(payload.into_iter().map(|target| {
                        Spark::Text(TextParticle::burst(burst.at, target, burst.hue, rng))
                    }));
                    report.text_bursts += 1;
                }
                None => {
                    self.sparks.extend(
                        (0..BURST_SIZE)
                            .map(|_| Spark::Plain(Particle::burst(burst.at, burst.hue, rng))),
                    );
                    report.explosions += 1;
                }
            }
        }

        self.sparks.retain_mut(Spark::advance);

        report
    }

    /// Starts fading every text particle still in the sky. Returns how many.
    pub fn fade_text(&mut self, decay: f32) -> usize {
        let mut faded = 0;
        for spark in &mut self.sparks {
            if let Spark::Text(p) = spark {
                p.decay = decay;
                faded += 1;
            }
        }
        faded
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.sparks.clear();
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.sparks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::FINALE_HUE;

    fn ticks_until_burst(pool: &mut EntityPool, rng: &mut Rng) -> TickReport {
        for _ in 0..200 {
            let report = pool.advance_all(rng);
            if report.explosions + report.text_bursts > 0 {
                return report;
            }
        }
        panic!("rocket never burst");
    }

    #[test]
    fn plain_rocket_bursts_into_fixed_count() {
        let mut rng = Rng::with_seed(1);
        let mut pool = EntityPool::new();
        pool.spawn_projectile(
            Point::new(500.0, 800.0),
            Point::new(500.0, 300.0),
            false,
            None,
            &mut rng,
        );

        let report = ticks_until_burst(&mut pool, &mut rng);
        assert_eq!(report.explosions, 1);
        assert_eq!(report.text_bursts, 0);
        assert!(pool.projectiles().is_empty());
        assert_eq!(pool.sparks().len(), BURST_SIZE);
        assert!(pool.sparks().iter().all(|s| matches!(s, Spark::Plain(_))));
    }

    #[test]
    fn finale_payload_becomes_one_text_particle_per_point() {
        let mut rng = Rng::with_seed(2);
        let mut pool = EntityPool::new();
        let payload: Vec<Point> = (0..37).map(|i| Point::new(i as f32 * 3.0, 300.0)).collect();
        pool.spawn_projectile(
            Point::new(500.0, 800.0),
            Point::new(54.0, 300.0),
            true,
            Some(payload),
            &mut rng,
        );

        let report = ticks_until_burst(&mut pool, &mut rng);
        assert_eq!(report.text_bursts, 1);
        assert_eq!(report.explosions, 0);
        assert_eq!(pool.sparks().len(), 37);
        assert!(pool.sparks().iter().all(|s| matches!(s, Spark::Text(_))));
    }

    #[test]
    fn text_burst_keeps_payload_order() {
        let mut rng = Rng::with_seed(6);
        let mut pool = EntityPool::new();
        let payload: Vec<Point> = (0..12).map(|i| Point::new(200.0 + i as f32, 250.0)).collect();
        pool.spawn_projectile(
            Point::new(200.0, 800.0),
            Point::new(205.5, 250.0),
            true,
            Some(payload.clone()),
            &mut rng,
        );

        ticks_until_burst(&mut pool, &mut rng);
        let targets: Vec<Point> = pool
            .sparks()
            .iter()
            .filter_map(|s| match s {
                Spark::Text(p) => Some(p.target),
                Spark::Plain(_) => None,
            })
            .collect();
        assert_eq!(targets, payload);
    }

    #[test]
    fn finale_without_payload_is_a_gold_plain_burst() {
        let mut rng = Rng::with_seed(3);
        let mut pool = EntityPool::new();
        pool.spawn_projectile(
            Point::new(0.0, 800.0),
            Point::new(0.0, 500.0),
            true,
            None,
            &mut rng,
        );
        let report = ticks_until_burst(&mut pool, &mut rng);
        assert_eq!(report.explosions, 1);
        for spark in pool.sparks() {
            match spark {
                Spark::Plain(p) => assert_eq!(p.hue, FINALE_HUE),
                Spark::Text(_) => panic!("no payload, no text"),
            }
        }
    }

    #[test]
    fn plain_sparks_are_pruned_and_text_sparks_persist() {
        let mut rng = Rng::with_seed(4);
        let mut pool = EntityPool::new();
        pool.spawn_projectile(
            Point::new(100.0, 800.0),
            Point::new(100.0, 500.0),
            false,
            None,
            &mut rng,
        );
        pool.spawn_projectile(
            Point::new(300.0, 800.0),
            Point::new(300.0, 500.0),
            true,
            Some(vec![Point::new(300.0, 400.0); 5]),
            &mut rng,
        );

        for _ in 0..400 {
            pool.advance_all(&mut rng);
        }
        assert_eq!(pool.sparks().len(), 5);
        assert!(pool.sparks().iter().all(|s| matches!(s, Spark::Text(_))));

        assert_eq!(pool.fade_text(TEXT_FADE), 5);
        for _ in 0..101 {
            pool.advance_all(&mut rng);
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut rng = Rng::with_seed(5);
        let mut pool = EntityPool::new();
        pool.spawn_projectile(
            Point::new(0.0, 800.0),
            Point::new(0.0, 0.0),
            false,
            None,
            &mut rng,
        );
        pool.advance_all(&mut rng);
        assert!(!pool.is_empty());
        pool.clear();
        assert!(pool.is_empty());
    }
}
