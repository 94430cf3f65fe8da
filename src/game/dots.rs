// ============================================================================
// game/dots.rs — Sketchbook
// The dots to collect and the contact rule that scores them.
// ============================================================================

use glam::Vec2;
use rand::Rng;

use super::{GameData, GameState};
use crate::sprites::PointInstance;

pub const CONTACT_RADIUS: f32 = 0.05;
pub const DOT_POINT_SIZE: f32 = 10.0;
const HIT_DIMMING: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitMark {
    #[default]
    Unhit,
    /// Collected and the player is still on it.
    JustHit,
    /// Collected earlier. Touching it again ends the game.
    Stale,
}

#[derive(Clone, Debug, Default)]
pub struct DotField {
    pub positions: Vec<Vec2>,
    pub intensities: Vec<f32>,
    pub marks: Vec<HitMark>,
    pub point_size: f32,
}

impl DotField {
    pub fn scatter(rng: &mut impl Rng, count: usize) -> Self {
        let positions = (0..count)
            .map(|_| Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)))
            .collect();
        let intensities = (0..count).map(|_| rng.gen_range(0.5..=1.0)).collect();
        Self {
            positions,
            intensities,
            marks: vec![HitMark::Unhit; count],
            point_size: DOT_POINT_SIZE,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Score dots under `player`. Returns the new state when the game ends.
    pub fn check_contacts(&mut self, player: Vec2, data: &mut GameData) -> Option<GameState> {
        let total = self.positions.len() as u64;
        for (position, mark) in self.positions.iter().zip(self.marks.iter_mut()) {
            let touching = position.distance(player) < CONTACT_RADIUS;
            match (*mark, touching) {
                (HitMark::Unhit, true) => {
                    data.score += 1;
                    *mark = HitMark::JustHit;
                    if data.score == total {
                        data.state = GameState::Win;
                        return Some(GameState::Win);
                    }
                }
                (HitMark::Stale, true) => {
                    data.state = GameState::GameOver;
                    return Some(GameState::GameOver);
                }
                (HitMark::JustHit, false) => *mark = HitMark::Stale,
                _ => {}
            }
        }
        None
    }

    /// Greyscale points, collected dots dimmed.
    pub fn instances(&self) -> Vec<PointInstance> {
        self.positions
            .iter()
            .zip(&self.intensities)
            .zip(&self.marks)
            .map(|((&p, &intensity), mark)| {
                let i = if *mark == HitMark::Unhit {
                    intensity
                } else {
                    intensity * HIT_DIMMING
                };
                PointInstance::new(p, [i, i, i])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(positions: &[Vec2]) -> DotField {
        DotField {
            positions: positions.to_vec(),
            intensities: vec![1.0; positions.len()],
            marks: vec![HitMark::Unhit; positions.len()],
            point_size: DOT_POINT_SIZE,
        }
    }

    #[test]
    fn scatter_is_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let dots = DotField::scatter(&mut rng, 10);
        assert_eq!(dots.len(), 10);
        assert!(dots.positions.iter().all(|p| p.abs().max_element() <= 1.0));
        assert!(dots.intensities.iter().all(|i| (0.5..=1.0).contains(i)));
        assert!(dots.marks.iter().all(|m| *m == HitMark::Unhit));
    }

    #[test]
    fn standing_on_a_dot_scores_once() {
        let mut dots = field(&[Vec2::ZERO, Vec2::ONE]);
        let mut data = GameData::default();

        assert_eq!(dots.check_contacts(Vec2::ZERO, &mut data), None);
        assert_eq!(dots.check_contacts(Vec2::new(0.01, 0.0), &mut data), None);
        assert_eq!(data.score, 1);
        assert_eq!(dots.marks[0], HitMark::JustHit);
    }

    #[test]
    fn leaving_a_dot_makes_it_stale_and_returning_loses() {
        let mut dots = field(&[Vec2::ZERO, Vec2::ONE]);
        let mut data = GameData::default();

        dots.check_contacts(Vec2::ZERO, &mut data);
        dots.check_contacts(Vec2::new(0.5, 0.5), &mut data);
        assert_eq!(dots.marks[0], HitMark::Stale);

        assert_eq!(
            dots.check_contacts(Vec2::ZERO, &mut data),
            Some(GameState::GameOver)
        );
        assert_eq!(data.state, GameState::GameOver);
        assert_eq!(data.score, 1);
    }

    #[test]
    fn collecting_every_dot_wins() {
        let mut dots = field(&[Vec2::ZERO, Vec2::new(0.5, 0.0)]);
        let mut data = GameData::default();

        dots.check_contacts(Vec2::ZERO, &mut data);
        assert_eq!(
            dots.check_contacts(Vec2::new(0.5, 0.0), &mut data),
            Some(GameState::Win)
        );
        assert_eq!(data.score, 2);
    }

    #[test]
    fn collected_dots_are_dimmed() {
        let mut dots = field(&[Vec2::ZERO, Vec2::ONE]);
        let mut data = GameData::default();
        dots.check_contacts(Vec2::ZERO, &mut data);

        let instances = dots.instances();
        assert_eq!(instances[0].color, [0.25; 3]);
        assert_eq!(instances[1].color, [1.0; 3]);
    }
}
