use crate::mesh::{Primitive, VertexLayout};
use crate::render::RenderCtx;
use crate::texture::GpuTexture;
use crate::transform::TransformState;

use super::{
    compile, requirements, ParamKind, ParamLocation, ParamMap, ShaderError, ShaderSource,
    ShaderStage, MODEL_VIEW_MATRIX, PROJECTION_MATRIX, SAMPLER, SAMPLER_FILTER,
};

const MATRIX_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

/// Compiled + linked program and its resolved parameters.
///
/// Linking produces the render pipeline; the bind group is created at link
/// time for untextured programs and by [`bind_texture`](Self::bind_texture)
/// otherwise.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params: ParamMap,

    projection_ubo: wgpu::Buffer,
    model_view_ubo: wgpu::Buffer,

    bind_group: Option<wgpu::BindGroup>,
    needs_texture: bool,
}

impl ShaderProgram {
    /// Compiles both stages and links them for meshes with `layout`.
    pub fn link(
        ctx: &RenderCtx<'_>,
        source: &ShaderSource,
        layout: &VertexLayout,
        primitive: Primitive,
    ) -> Result<Self, ShaderError> {
        let reqs = requirements(layout);
        let params = ParamMap::resolve(source, &reqs)?;
        let needs_texture = reqs.iter().any(|r| r.kind == ParamKind::Texture);

        let vs = compile(ctx.device, ShaderStage::Vertex, &source.vertex)?;
        let fs = compile(ctx.device, ShaderStage::Fragment, &source.fragment)?;

        let mut attributes = Vec::with_capacity(layout.attributes.len());
        for attr in &layout.attributes {
            let shader_location = params.attribute(attr.name).ok_or_else(|| {
                ShaderError::Link(format!("attribute `{}` has no location", attr.name))
            })?;
            attributes.push(wgpu::VertexAttribute {
                format: attr.format,
                offset: attr.offset,
                shader_location,
            });
        }

        let entries: Vec<wgpu::BindGroupLayoutEntry> = params
            .bindings()
            .into_iter()
            .filter_map(|(_, loc)| layout_entry(loc))
            .collect();

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("turntable program bgl"),
                entries: &entries,
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("turntable program layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("turntable program pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(params.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: layout.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(params.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: primitive.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: ctx.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderError::Link(err.to_string()));
        }

        let projection_ubo = matrix_buffer(ctx.device, "turntable projection ubo");
        let model_view_ubo = matrix_buffer(ctx.device, "turntable model-view ubo");

        let mut program = Self {
            pipeline,
            bind_group_layout,
            params,
            projection_ubo,
            model_view_ubo,
            bind_group: None,
            needs_texture,
        };

        if !needs_texture {
            program.bind_group = Some(program.create_bind_group(ctx.device, None));
        }

        log::info!(
            "linked shader program ({} -> {}, {} parameters)",
            program.params.vertex_entry(),
            program.params.fragment_entry(),
            reqs.len()
        );

        Ok(program)
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Bind group for drawing; `None` until a required texture is bound.
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Attaches `texture` to the `uSampler` / `uSamplerFilter` parameters.
    pub fn bind_texture(&mut self, device: &wgpu::Device, texture: &GpuTexture) {
        if !self.needs_texture {
            log::debug!("program samples no texture; bind_texture ignored");
            return;
        }
        self.bind_group = Some(self.create_bind_group(device, Some(texture)));
    }

    /// Uploads both matrices of `transform`.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, transform: &TransformState) {
        queue.write_buffer(
            &self.projection_ubo,
            0,
            bytemuck::cast_slice(&transform.projection().to_cols_array()),
        );
        queue.write_buffer(
            &self.model_view_ubo,
            0,
            bytemuck::cast_slice(&transform.model_view().to_cols_array()),
        );
    }

    fn create_bind_group(&self, device: &wgpu::Device, texture: Option<&GpuTexture>) -> wgpu::BindGroup {
        let mut entries = Vec::with_capacity(4);

        for (name, slot) in [
            (PROJECTION_MATRIX, &self.projection_ubo),
            (MODEL_VIEW_MATRIX, &self.model_view_ubo),
        ] {
            if let Some(binding) = self.params.binding(name) {
                entries.push(wgpu::BindGroupEntry {
                    binding,
                    resource: slot.as_entire_binding(),
                });
            }
        }

        if let Some(texture) = texture {
            if let Some(binding) = self.params.binding(SAMPLER) {
                entries.push(wgpu::BindGroupEntry {
                    binding,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                });
            }
            if let Some(binding) = self.params.binding(SAMPLER_FILTER) {
                entries.push(wgpu::BindGroupEntry {
                    binding,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                });
            }
        }

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("turntable program bind group"),
            layout: &self.bind_group_layout,
            entries: &entries,
        })
    }
}

fn matrix_buffer(device: &wgpu::Device, label: &'static str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: MATRIX_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn layout_entry(loc: ParamLocation) -> Option<wgpu::BindGroupLayoutEntry> {
    let ParamLocation::Binding { kind, binding, visibility, .. } = loc else {
        return None;
    };

    let ty = match kind {
        ParamKind::Uniform => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: std::num::NonZeroU64::new(MATRIX_SIZE),
        },
        ParamKind::Texture => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        ParamKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        ParamKind::Attribute => return None,
    };

    Some(wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty,
        count: None,
    })
}
