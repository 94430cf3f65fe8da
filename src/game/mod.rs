// ============================================================================
// game/mod.rs — Sketchbook
// Game state shared by the arcade demos and the entity logic they are built
// from. Nothing here touches the GPU.
// ============================================================================

pub mod asteroids;
pub mod dots;
pub mod player;
pub mod snake;
pub mod stars;

use glam::Vec2;

use crate::input::{DemoEvent, Input};

/// Seconds a finished game stays on screen before restarting.
pub const RESTART_DELAY: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    #[default]
    Playing,
    GameOver,
    Win,
}

impl GameState {
    pub fn banner(self) -> Option<&'static str> {
        match self {
            GameState::Playing => None,
            GameState::GameOver => Some("Game Over!"),
            GameState::Win => Some("*You Win!*"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GameData {
    pub state: GameState,
    pub score: u64,
    pub input: Input,
}

impl GameData {
    pub fn apply_event(&mut self, event: &DemoEvent) -> bool {
        self.input.apply(event)
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }
}

/// True once a finished game has been shown long enough.
pub fn restart_due(state: GameState, elapsed: f64) -> bool {
    state != GameState::Playing && elapsed > RESTART_DELAY
}

/// Wrap a position back into [-1, 1]² across the opposite edge.
pub fn wrap_unit(mut p: Vec2) -> Vec2 {
    if p.x < -1.0 {
        p.x += 2.0;
    }
    if p.x > 1.0 {
        p.x -= 2.0;
    }
    if p.y < -1.0 {
        p.y += 2.0;
    }
    if p.y > 1.0 {
        p.y -= 2.0;
    }
    p
}

/// "Score: N" in the top-left corner.
pub fn paint_score(ctx: &egui::Context, score: u64) {
    egui::Area::new(egui::Id::new("score"))
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("Score: {score}"))
                    .size(20.0)
                    .color(egui::Color32::WHITE),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_crosses_to_opposite_edge() {
        assert_eq!(wrap_unit(Vec2::new(1.25, 0.0)), Vec2::new(-0.75, 0.0));
        assert_eq!(wrap_unit(Vec2::new(0.0, -1.5)), Vec2::new(0.0, 0.5));
        assert_eq!(wrap_unit(Vec2::new(0.5, 1.0)), Vec2::new(0.5, 1.0));
    }

    #[test]
    fn restart_waits_for_delay() {
        assert!(!restart_due(GameState::Playing, 100.0));
        assert!(!restart_due(GameState::GameOver, 4.9));
        assert!(restart_due(GameState::GameOver, 5.1));
        assert!(restart_due(GameState::Win, 6.0));
    }

    #[test]
    fn banners_per_state() {
        assert_eq!(GameState::Playing.banner(), None);
        assert_eq!(GameState::GameOver.banner(), Some("Game Over!"));
        assert_eq!(GameState::Win.banner(), Some("*You Win!*"));
    }
}
