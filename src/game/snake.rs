// ============================================================================
// game/snake.rs — Sketchbook
// Snake on a wrap-around grid: stepping, steering, growth and collisions.
// ============================================================================

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::Rng;

pub const BOARD_CELLS: i32 = 20;
pub const STEP_SECONDS: f32 = 0.12;
pub const BLINK_SECONDS: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Crashed,
    /// The snake covers the whole board.
    Filled,
}

#[derive(Clone, Debug)]
pub struct Snake {
    /// Head first.
    pub body: VecDeque<IVec2>,
    pub heading: IVec2,
    pending: IVec2,
    pub food: IVec2,
    accumulator: f32,
    blink: f32,
}

impl Snake {
    pub fn new(rng: &mut impl Rng) -> Self {
        let body: VecDeque<IVec2> = [IVec2::new(10, 10), IVec2::new(9, 10), IVec2::new(8, 10)]
            .into_iter()
            .collect();
        let mut snake = Self {
            body,
            heading: IVec2::X,
            pending: IVec2::X,
            food: IVec2::ZERO,
            accumulator: 0.0,
            blink: 0.0,
        };
        snake.food = snake.free_cell(rng).unwrap_or(IVec2::ZERO);
        snake
    }

    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or(IVec2::ZERO)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Request a new heading. Zero input and reversing onto the neck are
    /// ignored.
    pub fn steer(&mut self, direction: Vec2) {
        let wanted = IVec2::new(direction.x.signum() as i32, direction.y.signum() as i32);
        let wanted = if direction.x != 0.0 {
            IVec2::new(wanted.x, 0)
        } else if direction.y != 0.0 {
            IVec2::new(0, wanted.y)
        } else {
            return;
        };
        if wanted == -self.heading {
            return;
        }
        self.pending = wanted;
    }

    /// Advance one cell.
    pub fn step(&mut self, rng: &mut impl Rng) -> StepOutcome {
        self.heading = self.pending;
        let next = wrap_cell(self.head() + self.heading);
        let grows = next == self.food;

        // The tail moves away this step unless the snake grows.
        let body_len = if grows { self.body.len() } else { self.body.len() - 1 };
        if self.body.iter().take(body_len).any(|&c| c == next) {
            return StepOutcome::Crashed;
        }

        self.body.push_front(next);
        if !grows {
            self.body.pop_back();
            return StepOutcome::Moved;
        }

        match self.free_cell(rng) {
            Some(cell) => {
                self.food = cell;
                StepOutcome::Ate
            }
            None => StepOutcome::Filled,
        }
    }

    /// Accumulate time and step as often as due. Stops at the first
    /// outcome that is not a plain move.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Vec<StepOutcome> {
        self.blink = (self.blink + dt) % (2.0 * BLINK_SECONDS);
        self.accumulator += dt;
        let mut outcomes = Vec::new();
        while self.accumulator >= STEP_SECONDS {
            self.accumulator -= STEP_SECONDS;
            let outcome = self.step(rng);
            outcomes.push(outcome);
            if matches!(outcome, StepOutcome::Crashed | StepOutcome::Filled) {
                self.accumulator = 0.0;
                break;
            }
        }
        outcomes
    }

    /// Head is drawn during the first half of each blink period.
    pub fn head_visible(&self) -> bool {
        self.blink < BLINK_SECONDS
    }

    fn free_cell(&self, rng: &mut impl Rng) -> Option<IVec2> {
        let free: Vec<IVec2> = (0..BOARD_CELLS)
            .flat_map(|y| (0..BOARD_CELLS).map(move |x| IVec2::new(x, y)))
            .filter(|c| !self.body.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }
}

pub fn wrap_cell(cell: IVec2) -> IVec2 {
    IVec2::new(cell.x.rem_euclid(BOARD_CELLS), cell.y.rem_euclid(BOARD_CELLS))
}

/// Centre of a cell in [-1, 1]², row 0 at the bottom.
pub fn cell_center(cell: IVec2) -> Vec2 {
    let size = 2.0 / BOARD_CELLS as f32;
    Vec2::new(
        -1.0 + (cell.x as f32 + 0.5) * size,
        -1.0 + (cell.y as f32 + 0.5) * size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snake_at(cells: &[(i32, i32)], heading: IVec2) -> Snake {
        let mut rng = StdRng::seed_from_u64(1);
        let mut snake = Snake::new(&mut rng);
        snake.body = cells.iter().map(|&(x, y)| IVec2::new(x, y)).collect();
        snake.heading = heading;
        snake.pending = heading;
        snake.food = IVec2::new(0, 19);
        snake
    }

    #[test]
    fn starts_heading_right_with_three_segments() {
        let snake = Snake::new(&mut StdRng::seed_from_u64(2));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), IVec2::new(10, 10));
        assert_eq!(snake.heading, IVec2::X);
        assert!(!snake.body.contains(&snake.food));
    }

    #[test]
    fn advances_and_wraps() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut snake = snake_at(&[(19, 5), (18, 5), (17, 5)], IVec2::X);
        assert_eq!(snake.step(&mut rng), StepOutcome::Moved);
        assert_eq!(snake.head(), IVec2::new(0, 5));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.body.back(), Some(&IVec2::new(18, 5)));
    }

    #[test]
    fn reversing_is_ignored() {
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], IVec2::X);
        snake.steer(Vec2::NEG_X);
        snake.steer(Vec2::ZERO);
        snake.step(&mut StdRng::seed_from_u64(4));
        assert_eq!(snake.head(), IVec2::new(6, 5));

        snake.steer(Vec2::Y);
        snake.step(&mut StdRng::seed_from_u64(4));
        assert_eq!(snake.head(), IVec2::new(6, 6));
    }

    #[test]
    fn eating_grows_and_moves_food() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], IVec2::X);
        snake.food = IVec2::new(6, 5);
        assert_eq!(snake.step(&mut rng), StepOutcome::Ate);
        assert_eq!(snake.len(), 4);
        assert_ne!(snake.food, IVec2::new(6, 5));
        assert!(!snake.body.contains(&snake.food));
    }

    #[test]
    fn running_into_the_body_crashes() {
        let mut rng = StdRng::seed_from_u64(6);
        // Head at (5,5) heading down into (5,4), which is part of the body.
        let mut snake = snake_at(&[(5, 5), (6, 5), (6, 4), (5, 4), (4, 4)], IVec2::NEG_Y);
        assert_eq!(snake.step(&mut rng), StepOutcome::Crashed);
    }

    #[test]
    fn following_the_tail_is_allowed() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut snake = snake_at(&[(5, 5), (6, 5), (6, 4), (5, 4)], IVec2::NEG_Y);
        assert_eq!(snake.step(&mut rng), StepOutcome::Moved);
        assert_eq!(snake.head(), IVec2::new(5, 4));
    }

    #[test]
    fn update_steps_on_the_clock() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], IVec2::X);
        assert!(snake.update(0.1, &mut rng).is_empty());
        assert_eq!(snake.update(0.05, &mut rng), vec![StepOutcome::Moved]);
        assert_eq!(snake.head(), IVec2::new(6, 5));
    }

    #[test]
    fn head_blinks() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], IVec2::X);
        assert!(snake.head_visible());
        snake.update(0.3, &mut rng);
        assert!(!snake.head_visible());
    }

    #[test]
    fn cells_map_into_unit_square() {
        assert!((cell_center(IVec2::new(0, 0)) - Vec2::new(-0.95, -0.95)).length() < 1e-6);
        assert!((cell_center(IVec2::new(19, 19)) - Vec2::new(0.95, 0.95)).length() < 1e-6);
    }
}
