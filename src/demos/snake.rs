// ============================================================================
// demos/snake.rs — Sketchbook
// Snake on a 20×20 wrap-around board drawn with square point sprites.
// ============================================================================

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::config::WindowSettings;
use crate::error::DemoError;
use crate::game::snake::{cell_center, Snake, StepOutcome, BOARD_CELLS};
use crate::game::{paint_score, restart_due, GameData, GameState};
use crate::input::DemoEvent;
use crate::sprites::{PointBatch, PointInstance, PointPipeline, PointShape};
use crate::timer::ElapsedTimer;

const BODY_COLOR: [f32; 3] = [0.1, 0.7, 0.2];
const HEAD_COLOR: [f32; 3] = [0.6, 1.0, 0.4];
const FOOD_COLOR: [f32; 3] = [1.0, 0.25, 0.2];

pub struct SnakeDemo {
    rng: StdRng,
    data: GameData,
    timer: ElapsedTimer,
    snake: Snake,
    points: PointPipeline,
    cells: PointBatch,
}

/// Cell sprites fill 90% of a cell.
fn cell_point_size(gpu: &Gpu) -> f32 {
    gpu.width.min(gpu.height) as f32 / BOARD_CELLS as f32 * 0.9
}

impl SnakeDemo {
    fn restart(&mut self) {
        self.snake = Snake::new(&mut self.rng);
        self.data.state = GameState::Playing;
        self.data.score = 0;
        log::info!("New snake");
    }

    fn instances(&self) -> Vec<PointInstance> {
        let mut points = Vec::with_capacity(self.snake.len() + 1);
        points.push(PointInstance::new(cell_center(self.snake.food), FOOD_COLOR));
        for (i, &cell) in self.snake.body.iter().enumerate() {
            if i == 0 {
                if !self.data.is_playing() || self.snake.head_visible() {
                    points.push(PointInstance::new(cell_center(cell), HEAD_COLOR));
                }
            } else {
                points.push(PointInstance::new(cell_center(cell), BODY_COLOR));
            }
        }
        points
    }
}

impl Demo for SnakeDemo {
    fn settings() -> WindowSettings {
        WindowSettings::new("Snake", 600, 600)
    }

    fn init(gpu: &Gpu, _assets: &Assets) -> Result<Self, DemoError> {
        let mut rng = StdRng::from_entropy();
        let snake = Snake::new(&mut rng);
        let points = PointPipeline::new(gpu);
        let capacity = (BOARD_CELLS * BOARD_CELLS) as usize;
        let cells = points.batch(gpu, cell_point_size(gpu), PointShape::Square, capacity);
        Ok(Self {
            rng,
            data: GameData::default(),
            timer: ElapsedTimer::new(),
            snake,
            points,
            cells,
        })
    }

    fn handle_event(&mut self, event: &DemoEvent) {
        self.data.apply_event(event);
    }

    fn update(&mut self, gpu: &Gpu, dt: f32) {
        if restart_due(self.data.state, self.timer.elapsed()) {
            self.restart();
        }

        if self.data.is_playing() {
            self.snake.steer(self.data.input.direction());
            for outcome in self.snake.update(dt, &mut self.rng) {
                match outcome {
                    StepOutcome::Moved => {}
                    StepOutcome::Ate => self.data.score += 1,
                    StepOutcome::Crashed => self.data.state = GameState::GameOver,
                    StepOutcome::Filled => {
                        self.data.score += 1;
                        self.data.state = GameState::Win;
                    }
                }
            }
            if !self.data.is_playing() {
                self.timer.restart();
                log::info!("{:?} with length {}", self.data.state, self.snake.len());
            }
        }

        let instances = self.instances();
        self.cells.upload(gpu, &instances, Vec2::ZERO, false);
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.points.draw(pass, &self.cells);
    }

    fn paint_ui(&mut self, ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {
        paint_score(ctx, self.data.score);
    }

    fn resize(&mut self, gpu: &Gpu) {
        self.cells.set_point_size(cell_point_size(gpu));
    }

    fn banner(&self) -> Option<String> {
        self.data.state.banner().map(str::to_owned)
    }
}
