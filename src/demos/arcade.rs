// ============================================================================
// demos/arcade.rs — Sketchbook
// Catch the Dot in space: parallax stars, drifting asteroids, and a ship that
// must dodge them while collecting the dots.
// ============================================================================

use super::catch_the_dot::CatchTheDot;
use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::config::WindowSettings;
use crate::error::DemoError;
use crate::game::asteroids::Asteroids;
use crate::game::stars::StarLayers;
use crate::game::{paint_score, GameState};
use crate::input::DemoEvent;
use crate::sprites::{PointBatch, PointShape, PolygonPipeline, PolygonShape, PolygonUniforms};

pub const ASTEROID_COUNT: usize = 3;

pub struct Arcade {
    round: CatchTheDot,
    stars: StarLayers,
    star_batches: Vec<PointBatch>,
    asteroids: Asteroids,
    polygons: PolygonPipeline,
    shapes: Vec<PolygonShape>,
}

impl Arcade {
    fn spawn_asteroids(&mut self, gpu: &Gpu) {
        self.asteroids = Asteroids::spawn(&mut self.round.rng, ASTEROID_COUNT);
        self.shapes = self
            .asteroids
            .asteroids
            .iter()
            .filter_map(|a| self.polygons.shape(gpu, &a.outline))
            .collect();
    }
}

impl Demo for Arcade {
    fn settings() -> WindowSettings {
        WindowSettings::new("Arcade", 600, 600)
    }

    fn init(gpu: &Gpu, _assets: &Assets) -> Result<Self, DemoError> {
        let mut round = CatchTheDot::new(gpu);
        let stars = StarLayers::generate(&mut round.rng);
        let star_batches = stars
            .layers
            .iter()
            .map(|layer| {
                round
                    .points
                    .batch(gpu, layer.point_size, PointShape::Round, layer.points.len() * 9)
            })
            .collect();

        let mut arcade = Self {
            round,
            stars,
            star_batches,
            asteroids: Asteroids::default(),
            polygons: PolygonPipeline::new(gpu),
            shapes: Vec::new(),
        };
        arcade.spawn_asteroids(gpu);
        Ok(arcade)
    }

    fn handle_event(&mut self, event: &DemoEvent) {
        self.round.data.apply_event(event);
    }

    fn update(&mut self, gpu: &Gpu, dt: f32) {
        if self.round.advance(gpu, dt) {
            self.spawn_asteroids(gpu);
        }

        self.stars.update(self.round.data.input, dt);
        self.asteroids.update(dt);
        if self.round.data.is_playing() && self.asteroids.check_ship(self.round.player.translation) {
            self.round.finish(GameState::GameOver);
        }

        for (layer, batch) in self.stars.layers.iter().zip(&mut self.star_batches) {
            batch.upload(gpu, &layer.points, layer.translation, true);
        }
        for (asteroid, shape) in self.asteroids.asteroids.iter().zip(&self.shapes) {
            shape.update(
                &gpu.queue,
                &PolygonUniforms {
                    color: asteroid.color,
                    translation: asteroid.translation.to_array(),
                    scale: asteroid.scale,
                    rotation: asteroid.rotation,
                },
            );
        }
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        for batch in &self.star_batches {
            self.round.points.draw(pass, batch);
        }
        self.round.paint_dots(pass);
        for shape in &self.shapes {
            self.polygons.draw(pass, shape);
        }
        self.round.paint_player(pass);
    }

    fn paint_ui(&mut self, ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {
        paint_score(ctx, self.round.data.score);
    }

    fn banner(&self) -> Option<String> {
        self.round.data.state.banner().map(str::to_owned)
    }
}
