// src/ui/manager.rs
//! ImGui UI manager
//!
//! Handles ImGui integration with wgpu and winit: frame timing, input
//! forwarding and drawing on top of the finished scene.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

/// ImGui UI manager
///
/// Owns the ImGui context together with its winit platform and wgpu renderer.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
    frame_ready: bool,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// Uses locked DPI mode; the drawing buffer size is set explicitly through
    /// [`UiManager::update_display_size`].
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(device: &Device, queue: &Queue, output_color_format: TextureFormat, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 18.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
            frame_ready: false,
        }
    }

    /// Updates ImGui's display size to match the render target
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    pub fn display_size(&self) -> [f32; 2] {
        self.context.io().display_size
    }

    /// Handles an input event and returns whether the UI captured it
    ///
    /// Captured input should not reach the camera controls.
    pub fn handle_input(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::Focused(_) => {
                let wrapped: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                self.platform.handle_event(self.context.io_mut(), window, &wrapped);

                let io = self.context.io();
                io.want_capture_mouse || io.want_capture_keyboard
            }
            _ => false,
        }
    }

    /// Prepares a new ImGui frame and runs `run_ui` to build it
    ///
    /// Returns whether the UI wants to capture input this frame.
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> bool
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare UI frame: {e}");
            self.frame_ready = false;
            return false;
        }

        let ui = self.context.frame();
        run_ui(&ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(&ui, window);
        }
        self.frame_ready = true;

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Draws the frame built by the last `update_logic()` call
    ///
    /// Loads the existing colour attachment so the scene underneath is kept.
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        if !std::mem::take(&mut self.frame_ready) {
            return;
        }
        let draw_data = self.context.render();

        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load, // keep the scene
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut render_pass) {
            log::error!("Failed to render UI: {e:?}");
        }
    }

    /// `update_logic()` followed by `render_display_only()`
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        self.update_logic(window, run_ui);
        self.render_display_only(device, queue, encoder, color_attachment);
    }
}
