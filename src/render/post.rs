use opx_core::animators::PostParams;

use super::helpers::{self, HDR_FORMAT};

/// Matches `PostUniforms` in `post.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    time: f32,
    bloom_intensity: f32,
    bloom_threshold: f32,
    chroma_offset: f32,
    vignette_offset: f32,
    vignette_darkness: f32,
    brightness: f32,
    contrast: f32,
    hue: f32,
    saturation: f32,
    grain: f32,
    bokeh_scale: f32,
    white_point: f32,
    _pad: [f32; 3],
}

impl PostUniforms {
    pub(crate) fn new(params: &PostParams, resolution: [f32; 2], time: f32, blur_dir: [f32; 2]) -> Self {
        Self {
            resolution,
            blur_dir,
            time,
            bloom_intensity: params.bloom_intensity,
            bloom_threshold: params.bloom_threshold,
            chroma_offset: params.chroma_offset,
            vignette_offset: params.vignette_offset,
            vignette_darkness: params.vignette_darkness,
            brightness: params.brightness,
            contrast: params.contrast,
            hue: params.hue,
            saturation: params.saturation,
            grain: params.grain,
            bokeh_scale: params.bokeh_scale,
            white_point: params.white_point,
            _pad: [0.0; 3],
        }
    }
}

/// Uniforms for one pass each. Every pass reads its own buffer because
/// queue writes all land before the encoder is submitted.
pub(crate) struct PostBuffers {
    pub(crate) main: wgpu::Buffer,
    pub(crate) blur_h: wgpu::Buffer,
    pub(crate) blur_v: wgpu::Buffer,
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) buffers: PostBuffers,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) struct PostBindGroups {
    /// HDR scene with the main uniforms (bright pass and composite).
    pub(crate) hdr: wgpu::BindGroup,
    /// Bloom A with the horizontal blur uniforms.
    pub(crate) from_bloom_a: wgpu::BindGroup,
    /// Bloom B with the vertical blur uniforms.
    pub(crate) from_bloom_b: wgpu::BindGroup,
    /// Blurred bloom sampled by the composite.
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            texture_entry(0),
            sampler_entry(1),
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
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[texture_entry(0), sampler_entry(1)],
    });
    let size = std::mem::size_of::<PostUniforms>();
    let buffers = PostBuffers {
        main: helpers::uniform_buffer(device, "post_uniforms", size),
        blur_h: helpers::uniform_buffer(device, "post_uniforms_blur_h", size),
        blur_v: helpers::uniform_buffer(device, "post_uniforms_blur_v", size),
    };
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("linear_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline =
        helpers::make_post_pipeline(device, &pl_bright_blur, post_shader, "fs_bright", HDR_FORMAT);
    let blur_pipeline =
        helpers::make_post_pipeline(device, &pl_bright_blur, post_shader, "fs_blur", HDR_FORMAT);
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
    );

    PostResources {
        bgl0,
        bgl1,
        buffers,
        sampler,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

fn source_group(
    device: &wgpu::Device,
    label: &str,
    post: &PostResources,
    view: &wgpu::TextureView,
    uniforms: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &post.bgl0,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&post.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniforms.as_entire_binding(),
            },
        ],
    })
}

/// Bind groups reference the target views, so they are rebuilt whenever the
/// targets are.
pub(crate) fn bind_groups(
    device: &wgpu::Device,
    post: &PostResources,
    hdr_view: &wgpu::TextureView,
    bloom_a_view: &wgpu::TextureView,
    bloom_b_view: &wgpu::TextureView,
) -> PostBindGroups {
    PostBindGroups {
        hdr: source_group(device, "bg_hdr", post, hdr_view, &post.buffers.main),
        from_bloom_a: source_group(device, "bg_from_bloom_a", post, bloom_a_view, &post.buffers.blur_h),
        from_bloom_b: source_group(device, "bg_from_bloom_b", post, bloom_b_view, &post.buffers.blur_v),
        bloom_a_only: device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &post.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&post.sampler),
                },
            ],
        }),
    }
}

pub(crate) fn write_post_uniforms(queue: &wgpu::Queue, buffer: &wgpu::Buffer, uniforms: &PostUniforms) {
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
