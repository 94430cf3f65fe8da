// ============================================================================
// renderer.rs — Sketchbook
// Large centred banner text ("Game Over!", "*You Win!*") via glyphon.
// ============================================================================

use glyphon::{
    Attrs, Buffer as TextBuffer, Cache as GlyphCache, Color as GlyphColor, Family, FontSystem,
    Metrics, Resolution, Shaping, SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer,
    Viewport as GlyphViewport,
};

use crate::pipeline::depth_state;

const BANNER_FONT_SIZE: f32 = 60.0;
const BANNER_LINE_HEIGHT: f32 = 72.0;

/// glyphon resources for the banner overlay drawn at the end of the main pass.
pub struct BannerRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    glyph_viewport: GlyphViewport,
    text_atlas: TextAtlas,
    text_renderer: TextRenderer,
    buffer: TextBuffer,
    current: Option<String>,
    visible: bool,
}

impl BannerRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let glyph_cache = GlyphCache::new(device);
        let glyph_viewport = GlyphViewport::new(device, &glyph_cache);
        let mut text_atlas = TextAtlas::new(device, queue, &glyph_cache, surface_format);
        let text_renderer = TextRenderer::new(
            &mut text_atlas,
            device,
            wgpu::MultisampleState::default(),
            Some(depth_state(false)),
        );
        let buffer = TextBuffer::new(
            &mut font_system,
            Metrics::new(BANNER_FONT_SIZE, BANNER_LINE_HEIGHT),
        );

        Self {
            font_system,
            swash_cache,
            glyph_viewport,
            text_atlas,
            text_renderer,
            buffer,
            current: None,
            visible: false,
        }
    }

    /// Lay out `text` centred in the window, or hide the banner for `None`.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        text: Option<&str>,
        win_w: u32,
        win_h: u32,
    ) {
        let Some(text) = text else {
            self.visible = false;
            return;
        };

        self.glyph_viewport.update(
            queue,
            Resolution {
                width: win_w,
                height: win_h,
            },
        );

        if self.current.as_deref() != Some(text) {
            self.buffer
                .set_size(&mut self.font_system, Some(win_w as f32), Some(win_h as f32));
            self.buffer.set_text(
                &mut self.font_system,
                text,
                Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
            );
            self.buffer.shape_until_scroll(&mut self.font_system, false);
            self.current = Some(text.to_string());
        }

        let (text_w, text_h) = self
            .buffer
            .layout_runs()
            .fold((0.0f32, 0.0f32), |(w, h), run| (w.max(run.line_w), h + run.line_height));
        let left = ((win_w as f32 - text_w) * 0.5).max(0.0);
        let top = ((win_h as f32 - text_h) * 0.5).max(0.0);

        let prepared = self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.text_atlas,
            &self.glyph_viewport,
            [TextArea {
                buffer: &self.buffer,
                left,
                top,
                scale: 1.0,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: win_w as i32,
                    bottom: win_h as i32,
                },
                default_color: GlyphColor::rgb(255, 255, 255),
                custom_glyphs: &[],
            }],
            &mut self.swash_cache,
        );
        match prepared {
            Ok(()) => self.visible = true,
            Err(err) => {
                log::warn!("Banner text preparation failed: {}", err);
                self.visible = false;
            }
        }
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible {
            return;
        }
        if let Err(err) = self
            .text_renderer
            .render(&self.text_atlas, &self.glyph_viewport, pass)
        {
            log::warn!("Banner text rendering failed: {}", err);
        }
    }

    /// Trim the glyph atlas after presenting.
    pub fn trim(&mut self) {
        self.text_atlas.trim();
    }
}
