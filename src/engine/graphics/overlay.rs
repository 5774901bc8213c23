//! Screen-space UI drawn with egui on top of the scene.

use log::debug;

/// Tessellated UI for one frame, ready to be encoded into a render pass.
pub struct OverlayFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    size_in_pixels: [u32; 2],
    pixels_per_point: f32,
}

impl OverlayFrame {
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

pub struct Overlay {
    context: egui::Context,
    renderer: egui_wgpu::Renderer,
    pending_free: Vec<egui::TextureId>,
}

/// Input for a display-only UI covering `size_in_pixels`.
pub fn raw_input(size_in_pixels: [u32; 2], pixels_per_point: f32) -> egui::RawInput {
    let mut raw = egui::RawInput {
        screen_rect: Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(size_in_pixels[0] as f32, size_in_pixels[1] as f32) / pixels_per_point,
        )),
        ..Default::default()
    };
    raw.viewports
        .entry(egui::ViewportId::ROOT)
        .or_default()
        .native_pixels_per_point = Some(pixels_per_point);
    raw
}

impl Overlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            context: egui::Context::default(),
            renderer: egui_wgpu::Renderer::new(device, format, None, 1),
            pending_free: Vec::new(),
        }
    }

    /// Runs `ui`, uploads any changed textures and tessellates the result.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size_in_pixels: [u32; 2],
        pixels_per_point: f32,
        ui: impl FnMut(&egui::Context),
    ) -> OverlayFrame {
        for id in self.pending_free.drain(..) {
            self.renderer.free_texture(&id);
        }

        let output = self.context.run(raw_input(size_in_pixels, pixels_per_point), ui);
        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        if !output.textures_delta.set.is_empty() {
            debug!("Uploaded {} UI textures", output.textures_delta.set.len());
        }
        // Freed after this frame has been drawn.
        self.pending_free = output.textures_delta.free;

        OverlayFrame {
            primitives: self.context.tessellate(output.shapes, output.pixels_per_point),
            size_in_pixels,
            pixels_per_point: output.pixels_per_point,
        }
    }

    /// Draws `frame` over `view` without clearing it. The returned command
    /// buffers must be submitted before `encoder`.
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        if frame.is_empty() {
            return Vec::new();
        }
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: frame.size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };
        let command_buffers = self
            .renderer
            .update_buffers(device, queue, encoder, &frame.primitives, &screen);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
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
        self.renderer.render(&mut render_pass, &frame.primitives, &screen);
        drop(render_pass);

        command_buffers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_input_covers_the_window_in_points() {
        let raw = raw_input([1280, 720], 2.0);
        let rect = raw.screen_rect.unwrap();
        assert_eq!(rect.width(), 640.0);
        assert_eq!(rect.height(), 360.0);
        assert_eq!(raw.viewports[&egui::ViewportId::ROOT].native_pixels_per_point, Some(2.0));
    }
}
