// ============================================================================
// app.rs — Sketchbook
// The `Demo` trait and the shared winit event-loop handler: GPU setup, egui
// integration, banner overlay, screenshots and the fixed per-frame order.
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes},
};

use crate::assets::Assets;
use crate::capture;
use crate::config::{AppConfig, WindowSettings};
use crate::error::DemoError;
use crate::input::DemoEvent;
use crate::pipeline::DepthTarget;
use crate::renderer::BannerRenderer;

// ======================== GPU Handle ========================

/// Device, queue and current surface size handed to demos.
pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl Gpu {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Surface size in physical pixels.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

// ======================== Demo Trait ========================

/// One interactive demo. The harness calls, every frame and in this order:
/// `handle_event` for pending input, `paint_ui`, `update`, then `paint`
/// inside the main render pass.
pub trait Demo: Sized + 'static {
    fn settings() -> WindowSettings;

    fn init(gpu: &Gpu, assets: &Assets) -> Result<Self, DemoError>;

    fn handle_event(&mut self, _event: &DemoEvent) {}

    fn update(&mut self, gpu: &Gpu, dt: f32);

    fn paint(&self, pass: &mut wgpu::RenderPass<'_>);

    fn paint_ui(&mut self, _ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {}

    fn resize(&mut self, _gpu: &Gpu) {}

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color::BLACK
    }

    /// Large centred text drawn over the scene.
    fn banner(&self) -> Option<String> {
        None
    }
}

/// Open the demo's window and run it until the window closes.
pub fn run<D: Demo>() -> Result<(), DemoError> {
    let config = AppConfig::load();
    let settings = config.apply(D::settings());
    log::info!(
        "Starting '{}' ({}x{}, assets: {:?})",
        settings.title,
        settings.width,
        settings.height,
        config.assets_dir
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::<D> {
        config,
        settings,
        state: None,
        failure: None,
    };
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ======================== Application ========================

struct App<D: Demo> {
    config: AppConfig,
    settings: WindowSettings,
    state: Option<AppState<D>>,
    failure: Option<DemoError>,
}

struct AppState<D: Demo> {
    // GPU
    gpu: Gpu,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth: DepthTarget,
    can_capture: bool,

    // Window
    window: Arc<Window>,
    cursor: Vec2,

    // Overlays
    banner: BannerRenderer,
    egui_ctx: egui::Context,
    egui_winit_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // Demo
    assets: Assets,
    demo: D,

    // Screenshots
    screenshot_dir: PathBuf,
    screenshot_requested: bool,

    // Timing
    show_fps: bool,
    last_redraw: Instant,
    fps: f32,
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match AppState::<D>::new(event_loop, &self.settings, &self.config) {
            Ok(state) => {
                // Kick off the first frame; some platforms never send one.
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("Failed to start '{}': {}", self.settings.title, err);
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // egui sees every event first
        let egui_response = state.egui_winit_state.on_window_event(&state.window, &event);
        let consumed = egui_response.consumed;

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                state.handle_keyboard(event_loop, &event, consumed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = Vec2::new(position.x as f32, position.y as f32);
                if !consumed {
                    state.demo.handle_event(&DemoEvent::MouseMoved {
                        position: state.cursor,
                    });
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let pressed = button_state.is_pressed();
                // Releases always reach the demo so drags and held buttons end.
                if !consumed || !pressed {
                    state.demo.handle_event(&DemoEvent::MouseButton {
                        button,
                        pressed,
                        position: state.cursor,
                    });
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if !consumed {
                    let scroll = match &delta {
                        MouseScrollDelta::LineDelta(_, y) => *y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                    };
                    state.demo.handle_event(&DemoEvent::Wheel { delta: scroll });
                }
            }

            WindowEvent::Resized(new_size) => state.resize(new_size),

            WindowEvent::RedrawRequested => state.redraw(),

            _ => {}
        }
    }
}

impl<D: Demo> AppState<D> {
    fn new(
        event_loop: &ActiveEventLoop,
        settings: &WindowSettings,
        config: &AppConfig,
    ) -> Result<Self, DemoError> {
        let window_attrs = WindowAttributes::default()
            .with_title(settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(settings.width, settings.height))
            .with_resizable(settings.resizable);
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| DemoError::Gpu(e.to_string()))?;

        let (device, queue, surface_config, can_capture) =
            pollster::block_on(init_gpu(&instance, &surface, &window, settings.vsync))?;
        surface.configure(&device, &surface_config);

        let gpu = Gpu {
            device,
            queue,
            surface_format: surface_config.format,
            width: surface_config.width,
            height: surface_config.height,
        };
        let depth = DepthTarget::new(&gpu.device, gpu.width, gpu.height);
        let banner = BannerRenderer::new(&gpu.device, &gpu.queue, gpu.surface_format);

        // ---- egui ----
        let egui_ctx = egui::Context::default();
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(27, 27, 35, 235);
        egui_ctx.set_visuals(visuals);

        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format, None, 1, false);

        let assets = Assets::new(config.assets_dir.clone());
        let demo = D::init(&gpu, &assets)?;

        log::info!(
            "'{}' initialized: {}x{}, surface {:?}",
            settings.title,
            gpu.width,
            gpu.height,
            gpu.surface_format
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth,
            can_capture,
            window,
            cursor: Vec2::ZERO,
            banner,
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            assets,
            demo,
            screenshot_dir: config.screenshot_dir.clone(),
            screenshot_requested: false,
            show_fps: settings.show_fps,
            last_redraw: Instant::now(),
            fps: 0.0,
        })
    }

    // ======================== Keyboard Handling ========================

    fn handle_keyboard(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent, egui_consumed: bool) {
        let pressed = event.state.is_pressed();
        if event.repeat {
            return;
        }

        // Global hotkeys, handled even when egui has focus
        match &event.logical_key {
            Key::Named(NamedKey::Escape) if pressed => {
                event_loop.exit();
                return;
            }
            Key::Named(NamedKey::F12) if pressed => {
                if self.can_capture {
                    self.screenshot_requested = true;
                } else {
                    log::warn!("Screenshots are not supported by this surface");
                }
                return;
            }
            _ => {}
        }

        if egui_consumed && pressed {
            return;
        }
        self.demo.handle_event(&DemoEvent::Key {
            key: event.logical_key.clone(),
            pressed,
        });
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.gpu.device, &self.surface_config);
        self.depth = DepthTarget::new(&self.gpu.device, new_size.width, new_size.height);
        self.gpu.width = new_size.width;
        self.gpu.height = new_size.height;
        self.demo.resize(&self.gpu);
    }

    // ======================== Frame Rendering ========================

    fn redraw(&mut self) {
        // FPS (exponential moving average)
        let now = Instant::now();
        let dt = now.duration_since(self.last_redraw).as_secs_f32().max(0.0001);
        self.last_redraw = now;
        self.fps = self.fps * 0.95 + (1.0 / dt) * 0.05;

        // ---- egui frame ----
        let raw_input = self.egui_winit_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.demo.paint_ui(ctx, &self.gpu, &self.assets);
            if self.show_fps {
                paint_fps(ctx, self.fps);
            }
        });
        self.egui_winit_state
            .handle_platform_output(&self.window, full_output.platform_output);

        // Long stalls (window drags) are capped so games do not jump.
        self.demo.update(&self.gpu, dt.min(0.25));

        let win_w = self.surface_config.width;
        let win_h = self.surface_config.height;
        let banner = self.demo.banner();
        self.banner
            .prepare(&self.gpu.device, &self.gpu.queue, banner.as_deref(), win_w, win_h);

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.gpu.device, &self.surface_config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        // Scene pass: demo geometry, then banner
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.demo.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.demo.paint(&mut pass);
            self.banner.render(&mut pass);
        }

        // ---- Screenshot capture (scene only, before the egui overlay) ----
        let capture = if self.screenshot_requested {
            self.screenshot_requested = false;
            let padded_bpr = capture::padded_bytes_per_row(win_w);
            let staging = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("screenshot_staging"),
                size: (padded_bpr * win_h) as u64,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    texture: &output.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &staging,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bpr),
                        rows_per_image: Some(win_h),
                    },
                },
                wgpu::Extent3d {
                    width: win_w,
                    height: win_h,
                    depth_or_array_layers: 1,
                },
            );
            Some((staging, padded_bpr))
        } else {
            None
        };

        self.gpu.queue.submit(std::iter::once(encoder.finish()));

        // ---- egui render pass (separate encoder) ----
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [win_w, win_h],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut egui_encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        let callback_buffers = self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut egui_encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        render_egui_pass(
            &self.egui_renderer,
            &mut egui_encoder,
            &view,
            &paint_jobs,
            &screen_descriptor,
        );
        self.gpu.queue.submit(
            callback_buffers
                .into_iter()
                .chain(std::iter::once(egui_encoder.finish())),
        );

        if let Some((staging, padded_bpr)) = capture {
            self.save_capture(&staging, padded_bpr, win_w, win_h);
        }

        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        self.banner.trim();
    }

    fn save_capture(&self, staging: &wgpu::Buffer, padded_bpr: u32, width: u32, height: u32) {
        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.gpu.device.poll(wgpu::Maintain::Wait);

        match rx.recv() {
            Ok(Ok(())) => {
                let rgba = {
                    let data = slice.get_mapped_range();
                    capture::unpad_rows(
                        &data,
                        padded_bpr,
                        width,
                        height,
                        capture::is_bgra(self.gpu.surface_format),
                    )
                };
                staging.unmap();
                match capture::save_screenshot(&self.screenshot_dir, width, height, &rgba) {
                    Ok(path) => log::info!("Screenshot saved: {:?}", path),
                    Err(e) => log::error!("Screenshot failed: {}", e),
                }
            }
            Ok(Err(e)) => log::error!("Screenshot readback failed: {}", e),
            Err(e) => log::error!("Screenshot readback failed: {}", e),
        }
    }
}

// ======================== GPU Initialization ========================

async fn init_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    window: &Window,
    vsync: bool,
) -> Result<(wgpu::Device, wgpu::Queue, wgpu::SurfaceConfiguration, bool), DemoError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| DemoError::Gpu("no suitable GPU adapter found".to_string()))?;

    log::info!("GPU: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("sketchbook_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .map_err(|e| DemoError::Gpu(e.to_string()))?;

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or_else(|| DemoError::Gpu("surface reports no formats".to_string()))?;

    let present_mode = choose_present_mode(&surface_caps.present_modes, vsync);
    log::info!("Present mode: {:?}", present_mode);

    let can_capture = surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC);
    let usage = if can_capture {
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC
    } else {
        wgpu::TextureUsages::RENDER_ATTACHMENT
    };

    let surface_config = wgpu::SurfaceConfiguration {
        usage,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode: surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    Ok((device, queue, surface_config, can_capture))
}

/// Fifo with vsync. Without it prefer Mailbox, then Immediate, then Fifo.
fn choose_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

fn paint_fps(ctx: &egui::Context, fps: f32) {
    egui::Area::new(egui::Id::new("fps_overlay"))
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("{fps:.0} fps")).monospace());
        });
}

// ======================== egui Render Helper ========================

/// Free function so the render pass does not borrow the whole `AppState`.
fn render_egui_pass(
    renderer: &egui_wgpu::Renderer,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    paint_jobs: &[egui::ClippedPrimitive],
    screen_descriptor: &egui_wgpu::ScreenDescriptor,
) {
    let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("egui_render_pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    // egui_wgpu::Renderer::render wants a RenderPass<'static>
    let mut pass = pass.forget_lifetime();
    renderer.render(&mut pass, paint_jobs, screen_descriptor);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_always_uses_fifo() {
        let modes = [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo];
        assert_eq!(choose_present_mode(&modes, true), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn uncapped_prefers_mailbox_then_immediate() {
        let all = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Immediate,
            wgpu::PresentMode::Mailbox,
        ];
        assert_eq!(choose_present_mode(&all, false), wgpu::PresentMode::Mailbox);
        let no_mailbox = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate];
        assert_eq!(choose_present_mode(&no_mailbox, false), wgpu::PresentMode::Immediate);
        assert_eq!(
            choose_present_mode(&[wgpu::PresentMode::Fifo], false),
            wgpu::PresentMode::Fifo
        );
    }
}
