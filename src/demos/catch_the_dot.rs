// ============================================================================
// demos/catch_the_dot.rs — Sketchbook
// Move the point over every dot exactly once. Touching a collected dot again
// ends the game.
// ============================================================================

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::config::WindowSettings;
use crate::error::DemoError;
use crate::game::dots::DotField;
use crate::game::player::Player;
use crate::game::{paint_score, restart_due, GameData, GameState};
use crate::input::DemoEvent;
use crate::sprites::{PointBatch, PointPipeline, PointShape};
use crate::timer::ElapsedTimer;

pub const DOT_COUNT: usize = 10;

pub struct CatchTheDot {
    pub(crate) rng: StdRng,
    pub(crate) data: GameData,
    pub(crate) timer: ElapsedTimer,
    pub(crate) dots: DotField,
    pub(crate) player: Player,
    pub(crate) points: PointPipeline,
    dot_batch: PointBatch,
    player_batch: PointBatch,
}

impl CatchTheDot {
    pub(crate) fn new(gpu: &Gpu) -> Self {
        let mut rng = StdRng::from_entropy();
        let dots = DotField::scatter(&mut rng, DOT_COUNT);
        let player = Player::default();
        let points = PointPipeline::new(gpu);
        let dot_batch = points.batch(gpu, dots.point_size, PointShape::Round, DOT_COUNT * 9);
        let player_batch = points.batch(gpu, player.point_size, PointShape::Round, 9);
        Self {
            rng,
            data: GameData::default(),
            timer: ElapsedTimer::new(),
            dots,
            player,
            points,
            dot_batch,
            player_batch,
        }
    }

    fn restart(&mut self) {
        self.dots = DotField::scatter(&mut self.rng, DOT_COUNT);
        self.player = Player::default();
        self.data.state = GameState::Playing;
        self.data.score = 0;
        log::info!("New round with {} dots", DOT_COUNT);
    }

    /// End the round with `state` and start the restart countdown.
    pub(crate) fn finish(&mut self, state: GameState) {
        self.data.state = state;
        self.timer.restart();
        log::info!("{:?} with score {}", state, self.data.score);
    }

    /// Game logic and uploads for one frame. Returns true if a new round
    /// started.
    pub(crate) fn advance(&mut self, gpu: &Gpu, dt: f32) -> bool {
        let restarted = restart_due(self.data.state, self.timer.elapsed());
        if restarted {
            self.restart();
        }

        self.player.update(self.data.input, dt);
        if self.data.is_playing() {
            if let Some(state) = self.dots.check_contacts(self.player.translation, &mut self.data) {
                self.finish(state);
            }
        }

        self.dot_batch
            .upload(gpu, &self.dots.instances(), Vec2::ZERO, true);
        self.player_batch.upload(
            gpu,
            &[self.player.instance()],
            self.player.translation,
            true,
        );
        restarted
    }

    pub(crate) fn paint_dots(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.points.draw(pass, &self.dot_batch);
    }

    pub(crate) fn paint_player(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.points.draw(pass, &self.player_batch);
    }
}

impl Demo for CatchTheDot {
    fn settings() -> WindowSettings {
        WindowSettings::new("Catch the Dot", 500, 500)
    }

    fn init(gpu: &Gpu, _assets: &Assets) -> Result<Self, DemoError> {
        Ok(Self::new(gpu))
    }

    fn handle_event(&mut self, event: &DemoEvent) {
        self.data.apply_event(event);
    }

    fn update(&mut self, gpu: &Gpu, dt: f32) {
        self.advance(gpu, dt);
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.paint_dots(pass);
        self.paint_player(pass);
    }

    fn paint_ui(&mut self, ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {
        paint_score(ctx, self.data.score);
    }

    fn banner(&self) -> Option<String> {
        self.data.state.banner().map(str::to_owned)
    }
}
