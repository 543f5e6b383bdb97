use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use elastic_core::geometry::Rect;
use elastic_core::mesh::{MeshGeometry, MeshVertex};
use elastic_core::renderer::{MeshRenderer, PresentCallback};
use elastic_core::uniform::UniformState;
use elastic_core::{RenderError, Snapshot};

use crate::coords::Viewport;

use super::{RenderCtx, RenderTarget};

/// Everything one `ElasticMeshRenderer::draw` records into.
pub struct MeshPass<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    presented: &'a mut Vec<PresentCallback>,
}

impl<'a> MeshPass<'a> {
    pub fn new(ctx: &'a RenderCtx<'_>, target: &'a mut RenderTarget<'_>) -> Self {
        Self {
            device: ctx.device,
            queue: ctx.queue,
            surface_format: ctx.surface_format,
            viewport: ctx.viewport,
            encoder: &mut *target.encoder,
            color_view: target.color_view,
            presented: &mut target.presented,
        }
    }
}

/// wgpu implementation of the snapshot deformation.
///
/// Mesh, snapshot and uniform updates are recorded on the CPU side and
/// turned into GPU resources lazily on the next `draw`, the only call that
/// sees the device. Pipelines and the sampler survive texture and mesh
/// changes, so one renderer can serve many transitions.
#[derive(Default)]
pub struct ElasticMeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    overlay_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
    uniform_ubo: Option<wgpu::Buffer>,

    texture: Option<wgpu::Texture>,
    texture_view: Option<wgpu::TextureView>,
    pending_snapshot: Option<Snapshot>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    index_count: u32,
    pending_mesh: Option<(Vec<MeshVertex>, Vec<u32>)>,

    uniform: UniformState,
}

impl ElasticMeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot is bound or waiting for upload.
    pub fn has_texture(&self) -> bool {
        self.texture_view.is_some() || self.pending_snapshot.is_some()
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("elastic shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/elastic.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("elastic bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ElasticUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("elastic pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let target = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(premul_alpha_blend()),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let primitive = wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Folded regions turn triangles over.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("elastic mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &target,
            }),
            primitive,
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let overlay_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("elastic overlay pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_overlay"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_overlay"),
                compilation_options: Default::default(),
                targets: &target,
            }),
            primitive,
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("elastic pipelines built for {format:?}");

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.overlay_pipeline = Some(overlay_pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
    }

    fn ensure_static_resources(&mut self, device: &wgpu::Device) {
        if self.uniform_ubo.is_none() {
            self.uniform_ubo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("elastic uniform ubo"),
                size: std::mem::size_of::<ElasticUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.bind_group = None;
        }

        if self.sampler.is_none() {
            self.sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("elastic snapshot sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
            self.bind_group = None;
        }
    }

    /// Uploads a snapshot handed over by `set_texture`.
    ///
    /// A rejected snapshot is dropped: the renderer stays without a texture
    /// until a new one is set.
    fn upload_snapshot(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<(), RenderError> {
        let Some(snapshot) = self.pending_snapshot.take() else {
            return Ok(());
        };

        let (width, height) = (snapshot.width(), snapshot.height());
        if snapshot.is_empty() {
            return Err(RenderError::EmptySnapshot { width, height });
        }
        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(RenderError::TextureTooLarge { width, height, max });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("elastic snapshot"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            snapshot.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        log::debug!("snapshot uploaded ({width}x{height})");

        self.texture_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.bind_group = None;
        Ok(())
    }

    fn ensure_bindings(&mut self, device: &wgpu::Device) {
        if self.bind_group.is_some() {
            return;
        }
        let (Some(bgl), Some(ubo), Some(view), Some(sampler)) = (
            self.bind_group_layout.as_ref(),
            self.uniform_ubo.as_ref(),
            self.texture_view.as_ref(),
            self.sampler.as_ref(),
        ) else {
            return;
        };

        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("elastic bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }

    fn upload_mesh(&mut self, device: &wgpu::Device) {
        let Some((vertices, indices)) = self.pending_mesh.take() else {
            return;
        };

        self.index_count = indices.len() as u32;
        if indices.is_empty() {
            self.vbo = None;
            self.ibo = None;
            return;
        }

        self.vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("elastic mesh vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.ibo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("elastic mesh ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

impl MeshRenderer for ElasticMeshRenderer {
    type Target<'a>
        = MeshPass<'a>
    where
        Self: 'a;

    /// Placement comes from the uniform's frame; only the grid is kept.
    fn resize(&mut self, mesh: &MeshGeometry, _frame: Rect) {
        self.pending_mesh = Some((mesh.vertices().to_vec(), mesh.indices().to_vec()));
    }

    fn upload_uniform(&mut self, uniform: &UniformState) {
        self.uniform = *uniform;
    }

    fn set_texture(&mut self, snapshot: &Snapshot) {
        self.pending_snapshot = Some(snapshot.clone());
        self.texture = None;
        self.texture_view = None;
        self.bind_group = None;
    }

    fn release_texture(&mut self) {
        self.pending_snapshot = None;
        self.texture = None;
        self.texture_view = None;
        self.bind_group = None;
    }

    fn draw(
        &mut self,
        pass: &mut MeshPass<'_>,
        on_presented: Option<PresentCallback>,
    ) -> Result<(), RenderError> {
        let (device, queue) = (pass.device, pass.queue);

        self.ensure_pipeline(device, pass.surface_format);
        self.ensure_static_resources(device);
        self.upload_snapshot(device, queue)?;
        self.upload_mesh(device);
        self.ensure_bindings(device);

        if self.texture_view.is_none() {
            return Err(RenderError::MissingTexture);
        }
        if self.index_count == 0 {
            return Err(RenderError::EmptyMesh);
        }

        let uniform = ElasticUniform::from_state(&self.uniform, pass.viewport);

        let (Some(pipeline), Some(overlay), Some(bind_group), Some(ubo), Some(vbo), Some(ibo)) = (
            self.pipeline.as_ref(),
            self.overlay_pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.uniform_ubo.as_ref(),
            self.vbo.as_ref(),
            self.ibo.as_ref(),
        ) else {
            return Err(RenderError::Backend("elastic resources unavailable".into()));
        };

        queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));

        {
            let mut rpass = pass.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("elastic pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: pass.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, bind_group, &[]);

            if uniform.overlay_alpha > 0.0 {
                rpass.set_pipeline(overlay);
                rpass.draw(0..6, 0..1);
            }

            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        pass.presented.extend(on_presented);
        Ok(())
    }
}

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── vertex layout ─────────────────────────────────────────────────────────

const MESH_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRS,
    }
}

// ── uniform ───────────────────────────────────────────────────────────────

/// GPU mirror of `ElasticUniform` in `shaders/elastic.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ElasticUniform {
    touch: [f32; 2],
    shift: [f32; 2],
    frame_origin: [f32; 2],
    frame_size: [f32; 2],
    viewport: [f32; 2],
    transpose: f32,
    flip: f32,
    fold_alpha: f32,
    overlay_alpha: f32,
    shadow_opacity: f32,
    shadow_radius: f32,
}

impl ElasticUniform {
    fn from_state(state: &UniformState, viewport: Viewport) -> Self {
        let frame = state.frame;
        Self {
            touch: state.normalized_touch(),
            shift: state.normalized_shift(),
            frame_origin: [frame.origin.x, frame.origin.y],
            frame_size: [frame.width(), frame.height()],
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            transpose: state.transpose(),
            flip: state.flip(),
            fold_alpha: state.fold_alpha,
            overlay_alpha: state.overlay_alpha.clamp(0.0, 1.0),
            shadow_opacity: state.shadow_opacity.clamp(0.0, 1.0),
            shadow_radius: state.shadow_radius.max(0.0),
        }
    }
}
