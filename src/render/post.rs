use scene_core::{NoiseUniforms, ToneMapping};

/// Uniform block of the output pass. Layout matches `output.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct OutputUniforms {
    pub(crate) tone_mapping: u32,
    pub(crate) encode_srgb: u32,
    pub(crate) exposure: f32,
    pub(crate) _pad: f32,
}

impl OutputUniforms {
    pub(crate) fn new(tone_mapping: ToneMapping, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            tone_mapping: tone_mapping.shader_mode(),
            encode_srgb: u32::from(!surface_format.is_srgb()),
            exposure: crate::constants::OUTPUT_EXPOSURE,
            _pad: 0.0,
        }
    }
}

pub(crate) struct PostResources {
    pub(crate) bgl: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) noise_uniform_buffer: wgpu::Buffer,
    pub(crate) output_uniform_buffer: wgpu::Buffer,
    pub(crate) noise_pipeline: wgpu::RenderPipeline,
    pub(crate) output_pipeline: wgpu::RenderPipeline,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    noise_shader: &wgpu::ShaderModule,
    output_shader: &wgpu::ShaderModule,
    hdr_format: wgpu::TextureFormat,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });
    let noise_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("noise_uniforms"),
        size: std::mem::size_of::<NoiseUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let output_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("output_uniforms"),
        size: std::mem::size_of::<OutputUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let noise_pipeline = super::helpers::make_post_pipeline(
        device,
        "noise_pipeline",
        &layout,
        noise_shader,
        "fs_noise",
        hdr_format,
        None,
    );
    let output_pipeline = super::helpers::make_post_pipeline(
        device,
        "output_pipeline",
        &layout,
        output_shader,
        "fs_output",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl,
        noise_uniform_buffer,
        output_uniform_buffer,
        noise_pipeline,
        output_pipeline,
    }
}

/// Bind `source` with `uniforms` for a post pass.
pub(crate) fn source_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    source: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(source),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniforms.as_entire_binding(),
            },
        ],
    })
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bind_group, &[]);
    r.draw(0..3, 0..1);
}
