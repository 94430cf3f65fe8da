// ============================================================================
// game/stars.rs — Sketchbook
// Parallax star field: five layers drifting at different speeds.
// ============================================================================

use glam::Vec2;
use rand::Rng;

use super::wrap_unit;
use crate::input::Input;
use crate::sprites::PointInstance;

pub const STAR_LAYERS: usize = 5;

#[derive(Clone, Debug)]
pub struct StarLayer {
    pub translation: Vec2,
    pub point_size: f32,
    pub points: Vec<PointInstance>,
}

impl StarLayer {
    /// Layer 0 is the nearest: biggest stars, fewest of them, fastest.
    pub fn speed(index: usize) -> f32 {
        1.0 / (index as f32 + 10.0)
    }
}

#[derive(Clone, Debug)]
pub struct StarLayers {
    pub layers: Vec<StarLayer>,
}

impl StarLayers {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let layers = (0..STAR_LAYERS)
            .map(|i| {
                let quantity = 200 * (i + 1);
                let points = (0..quantity)
                    .map(|_| {
                        let position =
                            Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
                        let intensity: f32 = rng.gen_range(0.5..=1.0);
                        PointInstance::new(position, [intensity; 3])
                    })
                    .collect();
                StarLayer {
                    translation: Vec2::ZERO,
                    point_size: 10.0 / (i as f32 + 1.0),
                    points,
                }
            })
            .collect();
        Self { layers }
    }

    pub fn update(&mut self, input: Input, dt: f32) {
        let direction = input.direction();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.translation = wrap_unit(layer.translation + direction * dt * StarLayer::speed(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn layers_grow_denser_and_smaller() {
        let stars = StarLayers::generate(&mut StdRng::seed_from_u64(3));
        assert_eq!(stars.layers.len(), STAR_LAYERS);
        assert_eq!(stars.layers[0].points.len(), 200);
        assert_eq!(stars.layers[4].points.len(), 1000);
        assert_eq!(stars.layers[0].point_size, 10.0);
        assert_eq!(stars.layers[1].point_size, 5.0);
    }

    #[test]
    fn near_layers_drift_faster() {
        let mut stars = StarLayers::generate(&mut StdRng::seed_from_u64(3));
        stars.update(Input::LEFT, 1.0);
        let near = stars.layers[0].translation.x;
        let far = stars.layers[4].translation.x;
        assert!((near + 0.1).abs() < 1e-6);
        assert!(near < far && far < 0.0);
    }

    #[test]
    fn drifting_wraps() {
        let mut stars = StarLayers::generate(&mut StdRng::seed_from_u64(3));
        for _ in 0..25 {
            stars.update(Input::UP, 1.0);
        }
        assert!(stars.layers.iter().all(|l| l.translation.y.abs() <= 1.0));
    }
}
