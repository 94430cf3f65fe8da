// ============================================================================
// game/player.rs — Sketchbook
// The player point (also the arcade ship).
// ============================================================================

use glam::Vec2;

use super::wrap_unit;
use crate::input::Input;
use crate::sprites::PointInstance;

pub const PLAYER_POINT_SIZE: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct Player {
    pub translation: Vec2,
    pub point_size: f32,
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            point_size: PLAYER_POINT_SIZE,
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    pub fn update(&mut self, input: Input, dt: f32) {
        self.translation = wrap_unit(self.translation + input.direction() * dt * self.speed);
    }

    pub fn instance(&self) -> PointInstance {
        PointInstance::new(Vec2::ZERO, [1.0, 1.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_at_half_unit_per_second() {
        let mut player = Player::default();
        player.update(Input::RIGHT, 1.0);
        assert_eq!(player.translation, Vec2::new(0.5, 0.0));
        player.update(Input::empty(), 1.0);
        assert_eq!(player.translation, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn wraps_around_edges() {
        let mut player = Player {
            translation: Vec2::new(0.0, 0.9),
            ..Default::default()
        };
        player.update(Input::UP, 0.5);
        assert!((player.translation.y - (-0.85)).abs() < 1e-6);
    }
}
