// ============================================================================
// demos/lookat_scene.rs — Sketchbook
// Walk through a small lit scene with a LookAt camera.
// ============================================================================

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::camera::{CameraMotion, LookAtCamera};
use crate::config::WindowSettings;
use crate::error::DemoError;
use crate::input::DemoEvent;
use crate::mesh::GpuMesh;
use crate::pipeline::{
    Lighting, MappingMode, Material, MeshRenderer, MeshUniforms, PipelineKey, Shading,
};
use crate::texture::Texture;

/// One placed model.
#[derive(Clone, Copy, Debug)]
pub struct SceneObject {
    pub model: &'static str,
    pub shading: Shading,
    pub texture: Option<&'static str>,
    pub kd: [f32; 3],
    pub translation: Vec3,
    pub yaw_degrees: f32,
    pub scale: Vec3,
}

impl SceneObject {
    const fn new(model: &'static str, shading: Shading, translation: Vec3, scale: f32) -> Self {
        Self {
            model,
            shading,
            texture: None,
            kd: [0.7, 0.7, 0.7],
            translation,
            yaw_degrees: 0.0,
            scale: Vec3::splat(scale),
        }
    }

    const fn diffuse(mut self, kd: [f32; 3]) -> Self {
        self.kd = kd;
        self
    }

    const fn textured(mut self, texture: &'static str) -> Self {
        self.texture = Some(texture);
        self
    }

    const fn turned(mut self, yaw_degrees: f32) -> Self {
        self.yaw_degrees = yaw_degrees;
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            self.translation,
        )
    }
}

pub const SCENE: [SceneObject; 8] = [
    // Floor
    SceneObject {
        scale: Vec3::new(2.5, 0.02, 2.5),
        ..SceneObject::new("box.obj", Shading::Texture, Vec3::new(0.0, -0.02, 0.0), 1.0)
    }
    .textured("maps/checker.png"),
    SceneObject::new("torus.obj", Shading::Phong, Vec3::new(-1.0, 0.3, 0.0), 0.3)
        .diffuse([0.8, 0.2, 0.2])
        .turned(90.0),
    SceneObject::new("sphere.obj", Shading::Phong, Vec3::new(1.0, 0.3, 0.0), 0.3)
        .diffuse([0.2, 0.3, 0.9]),
    SceneObject::new("cone.obj", Shading::Phong, Vec3::new(0.0, 0.3, -1.2), 0.3)
        .diffuse([0.2, 0.8, 0.3]),
    SceneObject::new("cylinder.obj", Shading::Texture, Vec3::new(0.0, 0.3, 0.3), 0.3)
        .textured("maps/stripes.png")
        .turned(-30.0),
    SceneObject::new("geosphere.obj", Shading::Texture, Vec3::new(-0.6, 0.25, 1.0), 0.25)
        .textured("maps/checker.png"),
    SceneObject::new("box.obj", Shading::Normal, Vec3::new(1.3, 0.25, -1.4), 0.25).turned(-120.0),
    SceneObject::new("geosphere.obj", Shading::Normal, Vec3::new(-1.4, 0.3, -1.4), 0.3),
];

pub const CAMERA_SPEED: f32 = 1.0;

/// Clear colour tinted by where the camera looks.
pub fn clear_from_target(at: Vec3) -> wgpu::Color {
    let tint = (at * 0.3).clamp(Vec3::ZERO, Vec3::ONE);
    wgpu::Color {
        r: tint.x as f64,
        g: tint.y as f64,
        b: tint.z as f64,
        a: 1.0,
    }
}

pub struct LookAtScene {
    camera: LookAtCamera,
    motion: CameraMotion,
    lighting: Lighting,
    shininess: f32,
    mapping: MappingMode,

    renderer: MeshRenderer,
    meshes: HashMap<&'static str, GpuMesh>,
    textures: HashMap<&'static str, wgpu::BindGroup>,
}

impl LookAtScene {
    fn help(ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("help"))
            .anchor(egui::Align2::LEFT_BOTTOM, [8.0, -8.0])
            .show(ctx, |ui| {
                ui.label("W/S or Up/Down: dolly");
                ui.label("A/D or Left/Right: pan");
                ui.label("Q/E: truck");
            });
    }

    fn lighting_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Lighting")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.add(egui::Slider::new(&mut self.shininess, 1.0..=100.0).text("shininess"));
                ui.horizontal(|ui| {
                    ui.label("light");
                    ui.add(egui::DragValue::new(&mut self.lighting.light_dir.x).speed(0.05));
                    ui.add(egui::DragValue::new(&mut self.lighting.light_dir.y).speed(0.05));
                    ui.add(egui::DragValue::new(&mut self.lighting.light_dir.z).speed(0.05));
                });
                egui::ComboBox::from_label("mapping")
                    .selected_text(self.mapping.name())
                    .show_ui(ui, |ui| {
                        for mode in MappingMode::ALL {
                            ui.selectable_value(&mut self.mapping, mode, mode.name());
                        }
                    });
            });
    }
}

impl Demo for LookAtScene {
    fn settings() -> WindowSettings {
        WindowSettings::new("LookAt Scene", 600, 600).with_fps(true)
    }

    fn init(gpu: &Gpu, assets: &Assets) -> Result<Self, DemoError> {
        let mut renderer = MeshRenderer::new(gpu, SCENE.len() as u32);

        let mut meshes = HashMap::new();
        let mut textures = HashMap::new();
        for object in &SCENE {
            renderer.ensure_pipeline(&gpu.device, PipelineKey::new(object.shading));
            if !meshes.contains_key(object.model) {
                let data = assets.load_mesh(object.model)?;
                meshes.insert(object.model, GpuMesh::upload(&gpu.device, &data, object.model));
            }
            if let Some(name) = object.texture {
                if !textures.contains_key(name) {
                    let texture = Texture::load(&gpu.device, &gpu.queue, &assets.path(name))?;
                    textures.insert(name, renderer.texture_bind_group(&gpu.device, &texture));
                }
            }
        }
        log::info!(
            "Scene ready: {} objects, {} meshes, {} textures",
            SCENE.len(),
            meshes.len(),
            textures.len()
        );

        Ok(Self {
            camera: LookAtCamera::default(),
            motion: CameraMotion::default(),
            lighting: Lighting::default(),
            shininess: Material::default().shininess,
            mapping: MappingMode::default(),
            renderer,
            meshes,
            textures,
        })
    }

    fn handle_event(&mut self, event: &DemoEvent) {
        if let DemoEvent::Key { key, pressed } = event {
            self.motion.apply_key(key, *pressed);
        }
    }

    fn update(&mut self, gpu: &Gpu, dt: f32) {
        self.motion.apply(&mut self.camera, dt * CAMERA_SPEED);

        let view = self.camera.view_matrix();
        let proj = self.camera.projection_matrix(gpu.aspect());
        for (slot, object) in SCENE.iter().enumerate() {
            let [r, g, b] = object.kd;
            let material = Material {
                kd: Vec4::new(r, g, b, 1.0),
                shininess: self.shininess,
                ..Material::default()
            };
            let uniforms = MeshUniforms::new(object.model_matrix(), view, proj)
                .with_lighting(&self.lighting)
                .with_material(&material)
                .with_mapping(self.mapping);
            self.renderer.write(&gpu.queue, slot as u32, &uniforms);
        }
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        for (slot, object) in SCENE.iter().enumerate() {
            let Some(mesh) = self.meshes.get(object.model) else {
                continue;
            };
            let texture = object.texture.and_then(|name| self.textures.get(name));
            self.renderer.draw(
                pass,
                PipelineKey::new(object.shading),
                slot as u32,
                mesh,
                texture,
                None,
            );
        }
    }

    fn paint_ui(&mut self, ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {
        Self::help(ctx);
        self.lighting_window(ctx);
    }

    fn clear_color(&self) -> wgpu::Color {
        clear_from_target(self.camera.at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_matrix_places_the_object() {
        let object = SceneObject::new("box.obj", Shading::Phong, Vec3::new(1.0, 2.0, 3.0), 0.5).turned(90.0);
        let m = object.model_matrix();
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
        // +X turns to -Z under a 90° yaw.
        let x = m.transform_vector3(Vec3::X);
        assert!((x - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
    }

    #[test]
    fn scene_mixes_all_lit_shaders() {
        for shading in [Shading::Phong, Shading::Texture, Shading::Normal] {
            assert!(SCENE.iter().any(|o| o.shading == shading), "{shading:?}");
        }
        assert!(SCENE
            .iter()
            .all(|o| (o.shading == Shading::Texture) == o.texture.is_some()));
    }

    #[test]
    fn scene_fits_in_view_distance() {
        let camera = LookAtCamera::default();
        for object in &SCENE {
            let distance = (object.translation - camera.eye).length();
            assert!(distance < camera.far, "{} too far", object.model);
        }
    }

    #[test]
    fn clear_colour_follows_target() {
        let color = clear_from_target(Vec3::new(0.0, 0.5, -1.0));
        assert_eq!(color.r, 0.0);
        assert!((color.g - 0.15).abs() < 1e-6);
        assert_eq!(color.b, 0.0);
    }
}
