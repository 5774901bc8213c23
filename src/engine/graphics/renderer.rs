use std::borrow::Cow;
use std::iter;

use glam::Vec3;
use log::{debug, info, warn};
use wgpu;
use wgpu::util::DeviceExt;

use crate::engine::graphics::mesh::Primitive;
use crate::engine::graphics::overlay::{Overlay, OverlayFrame};
use crate::engine::graphics::screenshot;
use crate::engine::graphics::texture::Texture;
use crate::engine::graphics::vertex::{InstanceRaw, Vertex};
use crate::error::ScreenshotError;

pub const MAX_POINT_LIGHTS: usize = 4;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Lit,
    Wireframe,
    Normals,
}

impl RenderMode {
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Lit => "Lit",
            RenderMode::Wireframe => "Wireframe",
            RenderMode::Normals => "Normals",
        }
    }

    fn shader_code(self) -> u32 {
        match self {
            RenderMode::Lit => 0,
            RenderMode::Wireframe => 1,
            RenderMode::Normals => 2,
        }
    }
}

/// Uniform block shared by every draw in a frame. Layout mirrors `Globals` in shader.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub ambient: [f32; 4],
    pub point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    pub point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    pub params: [u32; 4],
}

#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub primitive: Primitive,
    pub instance: InstanceRaw,
}

/// Instances sharing one mesh, drawn with a single call.
#[derive(Debug, Clone)]
pub struct Batch {
    pub primitive: Primitive,
    pub instances: Vec<InstanceRaw>,
}

#[derive(Debug, Default)]
pub struct DrawList {
    opaque: Vec<DrawItem>,
    transparent: Vec<DrawItem>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive, instance: InstanceRaw) {
        let item = DrawItem { primitive, instance };
        if instance.color[3] < 1.0 {
            self.transparent.push(item);
        } else {
            self.opaque.push(item);
        }
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Opaque instances grouped per primitive.
    pub fn opaque_batches(&self) -> Vec<Batch> {
        let mut batches: Vec<Batch> = Primitive::ALL
            .iter()
            .map(|&primitive| Batch { primitive, instances: Vec::new() })
            .collect();
        for item in &self.opaque {
            batches[item.primitive.index()].instances.push(item.instance);
        }
        batches.retain(|b| !b.instances.is_empty());
        batches
    }

    /// Translucent instances ordered back to front from `eye`, split into runs of one primitive.
    pub fn transparent_batches(&self, eye: Vec3) -> Vec<Batch> {
        let mut sorted = self.transparent.clone();
        sorted.sort_by(|a, b| {
            let da = a.instance.translation().distance_squared(eye);
            let db = b.instance.translation().distance_squared(eye);
            db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut batches: Vec<Batch> = Vec::new();
        for item in sorted {
            match batches.last_mut() {
                Some(last) if last.primitive == item.primitive => last.instances.push(item.instance),
                _ => batches.push(Batch {
                    primitive: item.primitive,
                    instances: vec![item.instance],
                }),
            }
        }
        batches
    }
}

pub struct Frame<'a> {
    pub globals: Globals,
    pub draws: &'a DrawList,
    pub clear_color: [f32; 4],
    pub mode: RenderMode,
    pub overlay: Option<&'a OverlayFrame>,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

pub struct Renderer {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: Option<wgpu::RenderPipeline>,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    materials: Texture,
    meshes: Vec<GpuMesh>,
    depth_texture: wgpu::Texture,
    overlay: Overlay,
}

impl Renderer {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Self {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps.formats.iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("../shaders/shader.wgsl"))),
        });

        let globals_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
                },
                count: None,
            }],
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::cast_slice(&[<Globals as bytemuck::Zeroable>::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let materials = Texture::create_material_array(&device, &queue);

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout, &materials.bind_group_layout],
            push_constant_ranges: &[],
        });

        let opaque_pipeline = create_pipeline(
            &device,
            &render_pipeline_layout,
            &shader,
            config.format,
            PipelineKind::Opaque,
        );
        let transparent_pipeline = create_pipeline(
            &device,
            &render_pipeline_layout,
            &shader,
            config.format,
            PipelineKind::Transparent,
        );
        let wireframe_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(create_pipeline(
                &device,
                &render_pipeline_layout,
                &shader,
                config.format,
                PipelineKind::Wireframe,
            ))
        } else {
            warn!("POLYGON_MODE_LINE unsupported, wireframe mode falls back to flat shading");
            None
        };

        let meshes = Primitive::ALL
            .iter()
            .map(|primitive| {
                let data = primitive.mesh();
                GpuMesh {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Primitive Vertex Buffer"),
                        contents: bytemuck::cast_slice(&data.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Primitive Index Buffer"),
                        contents: bytemuck::cast_slice(&data.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: data.index_count(),
                }
            })
            .collect();

        let depth_texture = create_depth_texture(&device, config.width, config.height);
        let overlay = Overlay::new(&device, config.format);
        info!(
            "Renderer ready: {}x{} {:?}, wireframe {}",
            config.width,
            config.height,
            config.format,
            if wireframe_pipeline.is_some() { "available" } else { "unavailable" }
        );

        Self {
            device,
            queue,
            config,
            opaque_pipeline,
            transparent_pipeline,
            wireframe_pipeline,
            globals_buffer,
            globals_bind_group,
            materials,
            meshes,
            depth_texture,
            overlay,
        }
    }

    /// Whether `RenderMode::Wireframe` draws real lines rather than flat fill.
    pub fn supports_wireframe(&self) -> bool {
        self.wireframe_pipeline.is_some()
    }

    /// Builds this frame's UI at the current surface size.
    pub fn prepare_overlay(&mut self, pixels_per_point: f32, ui: impl FnMut(&egui::Context)) -> OverlayFrame {
        let size = [self.config.width, self.config.height];
        self.overlay.prepare(&self.device, &self.queue, size, pixels_per_point, ui)
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, surface: &wgpu::Surface) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, new_size.width, new_size.height);
        }
    }

    /// Reapplies the current configuration after the surface was lost or outdated.
    pub fn reconfigure(&self, surface: &wgpu::Surface) {
        surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, surface: &wgpu::Surface, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let output = surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = self.depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        self.encode_scene(&mut encoder, &view, &depth_view, frame);
        let overlay_commands = self.encode_overlay(&mut encoder, &view, frame);

        self.queue.submit(overlay_commands.into_iter().chain(iter::once(encoder.finish())));
        output.present();
        Ok(())
    }

    /// Renders `frame` offscreen and reads it back as an RGBA image.
    pub fn capture(&mut self, frame: &Frame) -> Result<image::RgbaImage, ScreenshotError> {
        let width = self.config.width;
        let height = self.config.height;
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            label: Some("Screenshot Target"),
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = self.depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_row = screenshot::padded_bytes_per_row(width);
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screenshot Buffer"),
            size: padded_row as wgpu::BufferAddress * height as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Screenshot Encoder"),
        });
        self.encode_scene(&mut encoder, &view, &depth_view, frame);
        let overlay_commands = self.encode_overlay(&mut encoder, &view, frame);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        self.queue.submit(overlay_commands.into_iter().chain(iter::once(encoder.finish())));

        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = crossbeam_channel::bounded(1);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| ScreenshotError::ChannelClosed)??;

        let image = {
            let data = buffer_slice.get_mapped_range();
            screenshot::unpad_rows(&data, width, height, padded_row, screenshot::is_bgra(self.config.format))?
        };
        output_buffer.unmap();
        debug!("Captured {}x{} frame", width, height);
        Ok(image)
    }

    fn encode_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        frame: &Frame,
    ) -> Vec<wgpu::CommandBuffer> {
        match frame.overlay {
            Some(overlay) => self.overlay.encode(&self.device, &self.queue, encoder, color_view, overlay),
            None => Vec::new(),
        }
    }

    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        frame: &Frame,
    ) {
        let mut globals = frame.globals;
        globals.params[0] = frame.mode.shader_code();
        self.queue.write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[globals]));

        let eye = Vec3::new(globals.eye[0], globals.eye[1], globals.eye[2]);
        let upload = |batches: Vec<Batch>| -> Vec<(Primitive, wgpu::Buffer, u32)> {
            batches
                .into_iter()
                .map(|batch| {
                    let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Instance Buffer"),
                        contents: bytemuck::cast_slice(&batch.instances),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    (batch.primitive, buffer, batch.instances.len() as u32)
                })
                .collect()
        };
        let opaque = upload(frame.draws.opaque_batches());
        let transparent = upload(frame.draws.transparent_batches(eye));

        let wireframe = match (frame.mode, &self.wireframe_pipeline) {
            (RenderMode::Wireframe, Some(pipeline)) => Some(pipeline),
            _ => None,
        };

        let [r, g, b, a] = frame.clear_color;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
        render_pass.set_bind_group(1, &self.materials.bind_group, &[]);

        let passes = [
            (wireframe.unwrap_or(&self.opaque_pipeline), &opaque),
            (wireframe.unwrap_or(&self.transparent_pipeline), &transparent),
        ];
        for (pipeline, batches) in passes {
            render_pass.set_pipeline(pipeline);
            for (primitive, instances, count) in batches {
                let mesh = &self.meshes[primitive.index()];
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, instances.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..*count);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum PipelineKind {
    Opaque,
    Transparent,
    Wireframe,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, blend, depth_write_enabled, polygon_mode) = match kind {
        PipelineKind::Opaque => ("Opaque Pipeline", wgpu::BlendState::REPLACE, true, wgpu::PolygonMode::Fill),
        PipelineKind::Transparent => (
            "Transparent Pipeline",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
            wgpu::PolygonMode::Fill,
        ),
        PipelineKind::Wireframe => ("Wireframe Pipeline", wgpu::BlendState::REPLACE, true, wgpu::PolygonMode::Line),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::desc(), InstanceRaw::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        label: Some("Depth Texture"),
        view_formats: &[],
    })
}
