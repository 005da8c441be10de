//! egui overlay showing the entity count and frame rate

use common::GraphicsContext;
use glam::Vec2;
use winit::event::WindowEvent;

pub struct Hud {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Hud {
    pub fn new(ctx: &GraphicsContext) -> Self {
        let egui_ctx = egui::Context::default();
        let state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx: egui_ctx,
            state,
            renderer,
        }
    }

    /// Feed a window event to egui; the HUD never consumes input
    pub fn on_window_event(&mut self, ctx: &GraphicsContext, event: &WindowEvent) {
        let _ = self.state.on_window_event(&ctx.window, event);
    }

    /// Draw `text` with its top-left corner at `anchor` (window pixels) over
    /// whatever `view` already holds
    pub fn render(
        &mut self,
        ctx: &GraphicsContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        anchor: Vec2,
        text: &str,
    ) {
        let scale = ctx.window.scale_factor() as f32;
        let position = egui::pos2(anchor.x / scale, anchor.y / scale);
        let raw_input = self.state.take_egui_input(&ctx.window);
        let full_output = self.ctx.run(raw_input, |ui_ctx| {
            egui::Area::new(egui::Id::new("hud"))
                .fixed_pos(position)
                .interactable(false)
                .show(ui_ctx, |ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .color(egui::Color32::WHITE)
                            .monospace(),
                    );
                });
        });

        self.state
            .handle_platform_output(&ctx.window, full_output.platform_output);
        let tris = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&ctx.device, &ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [ctx.size.width, ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let callbacks = self.renderer.update_buffers(
            &ctx.device,
            &ctx.queue,
            encoder,
            &tris,
            &screen_descriptor,
        );
        if !callbacks.is_empty() {
            ctx.queue.submit(callbacks);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Render Pass"),
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
            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
