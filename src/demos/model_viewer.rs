// ============================================================================
// demos/model_viewer.rs — Sketchbook
// Trackball viewer for .obj models with switchable shading, culling,
// winding and projection.
// ============================================================================

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3, Vec4};
use winit::event::MouseButton;

use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::config::WindowSettings;
use crate::error::{AssetError, DemoError};
use crate::input::DemoEvent;
use crate::mesh::{GpuMesh, MeshData};
use crate::pipeline::{FrontFace, MeshRenderer, MeshUniforms, PipelineKey, Shading};
use crate::trackball::TrackBall;

/// Bundled primitives: display name and file in the assets directory.
pub const MODELS: [(&str, &str); 6] = [
    ("Torus", "torus.obj"),
    ("Box", "box.obj"),
    ("Sphere", "sphere.obj"),
    ("Geosphere", "geosphere.obj"),
    ("Cylinder", "cylinder.obj"),
    ("Cone", "cone.obj"),
];

pub const ZOOM_STEP: f32 = 0.2;
pub const ZOOM_MIN: f32 = -1.5;
pub const ZOOM_MAX: f32 = 1.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 5.0;

/// Scrolling up moves the eye away from the model.
pub fn wheel_zoom(zoom: f32, delta: f32) -> f32 {
    if delta == 0.0 {
        return zoom;
    }
    let step = if delta > 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
    (zoom + step).clamp(ZOOM_MIN, ZOOM_MAX)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl Projection {
    pub const ALL: [Projection; 2] = [Projection::Perspective, Projection::Orthographic];

    pub fn name(self) -> &'static str {
        match self {
            Projection::Perspective => "Perspective",
            Projection::Orthographic => "Orthographic",
        }
    }

    pub fn matrix(self, aspect: f32) -> Mat4 {
        match self {
            Projection::Perspective => {
                Mat4::perspective_rh(45f32.to_radians(), aspect.max(f32::EPSILON), NEAR, FAR)
            }
            Projection::Orthographic => Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, NEAR, FAR),
        }
    }
}

/// A typed path is tried as given first, then relative to the assets
/// directory.
pub fn resolve_model_path(assets: &Assets, input: &str) -> PathBuf {
    let input = input.trim();
    let direct = PathBuf::from(input);
    if direct.is_absolute() || direct.exists() {
        direct
    } else {
        assets.path(input)
    }
}

fn load_normalized(path: &Path) -> Result<MeshData, AssetError> {
    let mut mesh = MeshData::load(path)?;
    mesh.normalize();
    Ok(mesh)
}

pub struct ModelViewer {
    renderer: MeshRenderer,
    mesh: GpuMesh,
    model_name: String,
    selected: usize,
    triangles: u32,

    trackball: TrackBall,
    zoom: f32,
    projection: Projection,
    key: PipelineKey,
    color: [f32; 3],

    path: String,
    status: String,
}

impl ModelViewer {
    fn replace_mesh(&mut self, gpu: &Gpu, name: String, mesh: &MeshData) {
        self.mesh = GpuMesh::upload(&gpu.device, mesh, &name);
        self.triangles = self.mesh.triangle_count();
        self.status = format!("{} ({} triangles)", name, self.triangles);
        self.model_name = name;
    }

    /// Load `path` and show it. On failure the current model stays.
    fn load(&mut self, gpu: &Gpu, path: &Path) {
        match load_normalized(path) {
            Ok(mesh) => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("model")
                    .to_owned();
                self.replace_mesh(gpu, name, &mesh);
            }
            Err(err) => {
                log::warn!("Keeping '{}': {}", self.model_name, err);
                self.status = err.to_string();
            }
        }
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 2.0 + self.zoom), Vec3::ZERO, Vec3::Y)
    }

    fn controls(&mut self, ui: &mut egui::Ui, gpu: &Gpu, assets: &Assets) {
        let mut selected = self.selected;
        egui::ComboBox::from_label("Model")
            .selected_text(MODELS[self.selected].0)
            .show_ui(ui, |ui| {
                for (i, (name, _)) in MODELS.iter().enumerate() {
                    ui.selectable_value(&mut selected, i, *name);
                }
            });
        if selected != self.selected {
            self.selected = selected;
            self.load(gpu, &assets.path(MODELS[selected].1));
        }

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.path).hint_text("path/to/model.obj"));
            if ui.button("Load").clicked() && !self.path.trim().is_empty() {
                let path = resolve_model_path(assets, &self.path);
                self.load(gpu, &path);
            }
        });

        ui.add(
            egui::Slider::new(&mut self.triangles, 0..=self.mesh.triangle_count())
                .suffix(" triangles"),
        );

        ui.separator();
        egui::ComboBox::from_label("Shader")
            .selected_text(self.key.shading.name())
            .show_ui(ui, |ui| {
                for shading in Shading::VIEWER {
                    ui.selectable_value(&mut self.key.shading, shading, shading.name());
                }
            });
        ui.horizontal(|ui| {
            ui.color_edit_button_rgb(&mut self.color);
            ui.label("Model color");
        });

        ui.checkbox(&mut self.key.cull_back, "Back-face culling");
        egui::ComboBox::from_label("Front face")
            .selected_text(self.key.front_face.name())
            .show_ui(ui, |ui| {
                for face in [FrontFace::Ccw, FrontFace::Cw] {
                    ui.selectable_value(&mut self.key.front_face, face, face.name());
                }
            });
        egui::ComboBox::from_label("Projection")
            .selected_text(self.projection.name())
            .show_ui(ui, |ui| {
                for projection in Projection::ALL {
                    ui.selectable_value(&mut self.projection, projection, projection.name());
                }
            });

        ui.separator();
        ui.label(self.status.as_str());
    }
}

impl Demo for ModelViewer {
    fn settings() -> WindowSettings {
        WindowSettings::new("Model Viewer", 600, 600).with_fps(true)
    }

    fn init(gpu: &Gpu, assets: &Assets) -> Result<Self, DemoError> {
        let (name, file) = MODELS[0];
        let data = assets.load_mesh(file)?;
        let mesh = GpuMesh::upload(&gpu.device, &data, name);
        let triangles = mesh.triangle_count();
        Ok(Self {
            renderer: MeshRenderer::new(gpu, 1),
            mesh,
            model_name: name.to_owned(),
            selected: 0,
            triangles,
            trackball: TrackBall::new(gpu.viewport()),
            zoom: 0.0,
            projection: Projection::default(),
            key: PipelineKey::new(Shading::Phong),
            color: [1.0, 1.0, 1.0],
            path: String::new(),
            status: format!("{} ({} triangles)", name, triangles),
        })
    }

    fn handle_event(&mut self, event: &DemoEvent) {
        match *event {
            DemoEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
                position,
            } => {
                if pressed {
                    self.trackball.mouse_press(position);
                } else {
                    self.trackball.mouse_release(position);
                }
            }
            DemoEvent::MouseMoved { position } => self.trackball.mouse_move(position),
            DemoEvent::Wheel { delta } => self.zoom = wheel_zoom(self.zoom, delta),
            _ => {}
        }
    }

    fn update(&mut self, gpu: &Gpu, _dt: f32) {
        self.renderer.ensure_pipeline(&gpu.device, self.key);
        let model = Mat4::from_quat(self.trackball.rotation());
        let [r, g, b] = self.color;
        let uniforms = MeshUniforms::new(model, self.view_matrix(), self.projection.matrix(gpu.aspect()))
            .with_color(Vec4::new(r, g, b, 1.0));
        self.renderer.write(&gpu.queue, 0, &uniforms);
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.renderer
            .draw(pass, self.key, 0, &self.mesh, None, Some(self.triangles));
    }

    fn paint_ui(&mut self, ctx: &egui::Context, gpu: &Gpu, assets: &Assets) {
        egui::Window::new("Viewer")
            .default_pos([10.0, 10.0])
            .default_width(220.0)
            .show(ctx, |ui| self.controls(ui, gpu, assets));
    }

    fn resize(&mut self, gpu: &Gpu) {
        self.trackball.resize_viewport(gpu.viewport());
    }

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: 0.1,
            g: 0.1,
            b: 0.1,
            a: 1.0,
        }
    }

    fn banner(&self) -> Option<String> {
        (self.triangles == 0).then(|| "No more triangles!".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_zoom_steps_and_clamps() {
        assert!((wheel_zoom(0.0, 1.0) - 0.2).abs() < 1e-6);
        assert!((wheel_zoom(0.0, -3.0) + 0.2).abs() < 1e-6);
        assert_eq!(wheel_zoom(0.5, 0.0), 0.5);
        assert_eq!(wheel_zoom(0.9, 1.0), ZOOM_MAX);
        assert_eq!(wheel_zoom(-1.4, -1.0), ZOOM_MIN);
    }

    #[test]
    fn orthographic_maps_unit_square_to_clip_edges() {
        let proj = Projection::Orthographic.matrix(2.0);
        let corner = proj.project_point3(Vec3::new(1.0, -1.0, -NEAR));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y + 1.0).abs() < 1e-5);
        assert!(corner.z.abs() < 1e-5);
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -FAR));
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_uses_aspect() {
        let wide = Projection::Perspective.matrix(2.0);
        let square = Projection::Perspective.matrix(1.0);
        let p = Vec3::new(0.5, 0.0, -2.0);
        assert!(wide.project_point3(p).x < square.project_point3(p).x);
    }

    #[test]
    fn bundled_models_are_obj_files() {
        for (_, file) in MODELS {
            assert!(file.ends_with(".obj"));
        }
    }

    #[test]
    fn unknown_paths_resolve_into_assets() {
        let assets = Assets::new("/nonexistent-assets");
        assert_eq!(
            resolve_model_path(&assets, " teapot.obj "),
            PathBuf::from("/nonexistent-assets/teapot.obj")
        );
        assert_eq!(resolve_model_path(&assets, "/tmp/x.obj"), PathBuf::from("/tmp/x.obj"));
    }

    #[test]
    fn missing_model_is_an_error() {
        assert!(load_normalized(Path::new("/nonexistent-assets/none.obj")).is_err());
    }
}
