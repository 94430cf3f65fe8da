// ============================================================================
// demos/colored_triangles.rs — Sketchbook
// A canvas that keeps adding random triangles with editable vertex colours.
// ============================================================================

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::config::WindowSettings;
use crate::error::DemoError;
use crate::sprites::{ColorVertex, TrianglePipeline};

pub const MAX_TRIANGLES: usize = 512;
pub const DELAY_RANGE_MS: std::ops::RangeInclusive<u32> = 250..=5000;
/// Vertices are drawn from [-EXTENT, EXTENT]², so triangles overhang the canvas.
const EXTENT: f32 = 1.5;

/// Triangle generator with a ring of the most recent triangles.
pub struct TriangleSpray {
    pub colors: [[f32; 3]; 3],
    pub delay_ms: u32,
    triangles: VecDeque<[ColorVertex; 3]>,
    since_last: f32,
}

impl Default for TriangleSpray {
    fn default() -> Self {
        Self {
            colors: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            delay_ms: 1000,
            triangles: VecDeque::with_capacity(MAX_TRIANGLES),
            since_last: 0.0,
        }
    }
}

impl TriangleSpray {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.since_last = 0.0;
    }

    /// Add one triangle with the current colours, dropping the oldest when
    /// full.
    pub fn push_random(&mut self, rng: &mut impl Rng) {
        if self.triangles.len() == MAX_TRIANGLES {
            self.triangles.pop_front();
        }
        let triangle = self.colors.map(|[r, g, b]| ColorVertex {
            position: [rng.gen_range(-EXTENT..=EXTENT), rng.gen_range(-EXTENT..=EXTENT)],
            color: [r, g, b, 1.0],
        });
        self.triangles.push_back(triangle);
    }

    /// Returns true when a triangle was added.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> bool {
        self.since_last += dt;
        let delay = self.delay_ms.clamp(*DELAY_RANGE_MS.start(), *DELAY_RANGE_MS.end()) as f32 / 1000.0;
        if self.since_last < delay {
            return false;
        }
        self.since_last = 0.0;
        self.push_random(rng);
        true
    }

    pub fn vertices(&self) -> Vec<ColorVertex> {
        self.triangles.iter().flatten().copied().collect()
    }
}

pub struct ColoredTriangles {
    rng: StdRng,
    spray: TriangleSpray,
    triangles: TrianglePipeline,
    dirty: bool,
}

impl Demo for ColoredTriangles {
    fn settings() -> WindowSettings {
        WindowSettings::new("Colored Triangles", 600, 600)
    }

    fn init(gpu: &Gpu, _assets: &Assets) -> Result<Self, DemoError> {
        Ok(Self {
            rng: StdRng::from_entropy(),
            spray: TriangleSpray::default(),
            triangles: TrianglePipeline::new(gpu, MAX_TRIANGLES * 3),
            dirty: false,
        })
    }

    fn update(&mut self, gpu: &Gpu, dt: f32) {
        if self.spray.update(dt, &mut self.rng) {
            self.dirty = true;
        }
        if self.dirty {
            self.triangles.upload(gpu, &self.spray.vertices());
            self.dirty = false;
        }
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.triangles.draw(pass);
    }

    fn paint_ui(&mut self, ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {
        egui::Window::new("Triangles")
            .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                for (i, color) in self.spray.colors.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.color_edit_button_rgb(color);
                        ui.label(format!("v{i}"));
                    });
                }
                ui.add(egui::Slider::new(&mut self.spray.delay_ms, DELAY_RANGE_MS).text("delay (ms)"));
                ui.label(format!("{} triangles", self.spray.len()));
                if ui.button("Clear").clicked() {
                    self.spray.clear();
                    self.dirty = true;
                    log::info!("Canvas cleared");
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_one_triangle_per_delay() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut spray = TriangleSpray {
            delay_ms: 500,
            ..Default::default()
        };
        assert!(!spray.update(0.25, &mut rng));
        assert!(spray.update(0.25, &mut rng));
        assert_eq!(spray.len(), 1);
        assert!(!spray.update(0.25, &mut rng));
        assert_eq!(spray.len(), 1);
    }

    #[test]
    fn vertices_use_current_colours_and_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut spray = TriangleSpray::default();
        spray.colors[1] = [0.5, 0.25, 0.0];
        for _ in 0..20 {
            spray.push_random(&mut rng);
        }
        let vertices = spray.vertices();
        assert_eq!(vertices.len(), 60);
        assert_eq!(vertices[1].color, [0.5, 0.25, 0.0, 1.0]);
        assert!(vertices
            .iter()
            .all(|v| v.position.iter().all(|c| (-EXTENT..=EXTENT).contains(c))));
    }

    #[test]
    fn keeps_only_the_latest_triangles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut spray = TriangleSpray::default();
        for _ in 0..MAX_TRIANGLES {
            spray.push_random(&mut rng);
        }
        spray.colors = [[0.0; 3]; 3];
        spray.push_random(&mut rng);
        assert_eq!(spray.len(), MAX_TRIANGLES);
        let last = spray.vertices()[(MAX_TRIANGLES - 1) * 3];
        assert_eq!(last.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn clear_empties_the_canvas() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut spray = TriangleSpray::default();
        spray.push_random(&mut rng);
        spray.clear();
        assert!(spray.is_empty());
        assert!(spray.vertices().is_empty());
    }
}
