// ============================================================================
// game/asteroids.rs — Sketchbook
// Random polygon asteroids that drift, spin and end the game on contact.
// ============================================================================

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::wrap_unit;

/// Fraction of the scale that counts as a hit.
pub const HIT_RADIUS: f32 = 0.85;
/// Asteroids never spawn this close to the ship's start.
pub const SAFE_RADIUS: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct Asteroid {
    /// Unit-radius outline in local coordinates.
    pub outline: Vec<Vec2>,
    pub color: [f32; 4],
    pub translation: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub scale: f32,
}

impl Asteroid {
    pub fn random(rng: &mut impl Rng) -> Self {
        let sides = rng.gen_range(6..=20);
        let step = TAU / sides as f32;
        let outline = (0..sides)
            .map(|i| {
                let radius = rng.gen_range(0.8..=1.0);
                let angle = i as f32 * step;
                Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();

        let gray = rng.gen_range(0.3..=0.6);
        let translation = loop {
            let t = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
            if t.length() > SAFE_RADIUS {
                break t;
            }
        };
        let heading = rng.gen_range(0.0..TAU);

        Self {
            outline,
            color: [gray, gray, gray, 1.0],
            translation,
            velocity: Vec2::from_angle(heading) * rng.gen_range(0.05..=0.2),
            rotation: 0.0,
            angular_velocity: rng.gen_range(-1.0..=1.0),
            scale: 0.25 * rng.gen_range(0.5..=1.0),
        }
    }

    pub fn hits(&self, point: Vec2) -> bool {
        self.translation.distance(point) < self.scale * HIT_RADIUS
    }
}

#[derive(Clone, Debug, Default)]
pub struct Asteroids {
    pub asteroids: Vec<Asteroid>,
}

impl Asteroids {
    pub fn spawn(rng: &mut impl Rng, count: usize) -> Self {
        Self {
            asteroids: (0..count).map(|_| Asteroid::random(rng)).collect(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        for asteroid in &mut self.asteroids {
            asteroid.translation = wrap_unit(asteroid.translation + asteroid.velocity * dt);
            asteroid.rotation = (asteroid.rotation + asteroid.angular_velocity * dt) % TAU;
        }
    }

    /// True if any asteroid overlaps `ship`.
    pub fn check_ship(&self, ship: Vec2) -> bool {
        self.asteroids.iter().any(|a| a.hits(ship))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawned_asteroids_avoid_the_ship() {
        let mut rng = StdRng::seed_from_u64(11);
        let field = Asteroids::spawn(&mut rng, 20);
        for a in &field.asteroids {
            assert!(a.translation.length() > SAFE_RADIUS);
            assert!((6..=20).contains(&a.outline.len()));
            assert!((0.125..=0.25).contains(&a.scale));
            assert!(a.outline.iter().all(|p| (0.8 - 1e-5..=1.0 + 1e-5).contains(&p.length())));
        }
        assert!(!field.check_ship(Vec2::ZERO));
    }

    #[test]
    fn asteroids_drift_and_wrap() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = Asteroids::spawn(&mut rng, 1);
        field.asteroids[0].translation = Vec2::new(0.95, 0.0);
        field.asteroids[0].velocity = Vec2::new(0.2, 0.0);
        field.update(0.5);
        assert!((field.asteroids[0].translation.x - (-0.95)).abs() < 1e-5);
    }

    #[test]
    fn contact_within_scale_ends_game() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = Asteroids::spawn(&mut rng, 1);
        field.asteroids[0].translation = Vec2::new(0.3, 0.0);
        field.asteroids[0].scale = 0.25;
        assert!(field.check_ship(Vec2::new(0.15, 0.0)));
        assert!(!field.check_ship(Vec2::new(0.0, 0.0)));
    }
}
