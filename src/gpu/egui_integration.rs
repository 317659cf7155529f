//! The settings overlay's plumbing: winit events in, egui paint jobs out,
//! drawn into the same render pass as the frame texture.

use std::sync::Arc;
use winit::window::Window;

pub struct EguiIntegration {
    pub ctx: egui::Context,
    input: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// One tessellated egui frame, ready to upload and paint.
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiIntegration {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat, window: &Arc<Window>) -> Self {
        let ctx = egui::Context::default();
        let input = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        // No depth buffer, no MSAA, no dithering: the overlay sits on a flat blit.
        let renderer = egui_wgpu::Renderer::new(device, target_format, None, 1, false);

        Self { ctx, input, renderer }
    }

    /// Feed a window event to egui. True when egui used it.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.input.on_window_event(window, event).consumed
    }

    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.input.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
    }

    pub fn end_frame(&mut self, window: &Window) -> OverlayFrame {
        let output = self.ctx.end_pass();
        self.input.handle_platform_output(window, output.platform_output);

        OverlayFrame {
            primitives: self.ctx.tessellate(output.shapes, output.pixels_per_point),
            textures: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }

    /// Upload font and image updates plus vertex data. Any command buffers
    /// returned must be submitted ahead of the frame's own encoder.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &OverlayFrame,
        screen: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &frame.primitives, screen)
    }

    pub fn render(
        &self,
        pass: &mut wgpu::RenderPass<'static>,
        frame: &OverlayFrame,
        screen: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer.render(pass, &frame.primitives, screen);
    }

    /// Release textures egui no longer needs. Call after the frame is submitted.
    pub fn cleanup(&mut self, frame: &OverlayFrame) {
        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
    }
}
