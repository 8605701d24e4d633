use crate::gpu::Topology;
use crate::vertex::{ColoredVertex, GlyphVertex, TexturedVertex};

use super::texture::TARGET_FORMAT;

/// Texture bindings in the textured batch shader.
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Uniform block of the text shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextUniform {
    /// Column-major world → NDC matrix.
    pub view_proj: [[f32; 4]; 4],
    pub color: [f32; 4],
}

pub struct ColoredPipelines {
    pub triangles: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

impl ColoredPipelines {
    pub fn for_topology(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Triangles => &self.triangles,
            Topology::Lines => &self.lines,
            Topology::Points => &self.points,
        }
    }
}

pub struct TexturedPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    /// Bindings `0..16` are textures, binding 16 the sampler.
    pub textures_bgl: wgpu::BindGroupLayout,
}

pub struct TextPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub uniform_bgl: wgpu::BindGroupLayout,
    pub glyph_bgl: wgpu::BindGroupLayout,
}

pub struct Pipelines {
    pub colored: ColoredPipelines,
    pub textured: TexturedPipeline,
    pub text: TextPipeline,
}

impl Pipelines {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            colored: create_colored_pipelines(device),
            textured: create_textured_pipeline(device),
            text: create_text_pipeline(device),
        }
    }
}

fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Topology::Lines => wgpu::PrimitiveTopology::LineList,
        Topology::Points => wgpu::PrimitiveTopology::PointList,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
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

fn batch_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: Topology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: primitive_topology(topology),
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_colored_pipelines(device: &wgpu::Device) -> ColoredPipelines {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("colored_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/colored.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("colored_pipeline_layout"),
        bind_group_layouts: &[],
        ..Default::default()
    });

    let build = |label, topology| {
        batch_pipeline(device, label, &shader, &layout, ColoredVertex::layout(), topology)
    };
    ColoredPipelines {
        triangles: build("colored_triangles", Topology::Triangles),
        lines: build("colored_lines", Topology::Lines),
        points: build("colored_points", Topology::Points),
    }
}

fn create_textured_pipeline(device: &wgpu::Device) -> TexturedPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("textured_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/textured.wgsl").into()),
    });

    let mut entries: Vec<wgpu::BindGroupLayoutEntry> =
        (0..MAX_TEXTURE_SLOTS as u32).map(texture_entry).collect();
    entries.push(sampler_entry(MAX_TEXTURE_SLOTS as u32));
    let textures_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("textured_slots_bgl"),
        entries: &entries,
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("textured_pipeline_layout"),
        bind_group_layouts: &[&textures_bgl],
        ..Default::default()
    });

    let render_pipeline = batch_pipeline(
        device,
        "textured_triangles",
        &shader,
        &layout,
        TexturedVertex::layout(),
        Topology::Triangles,
    );
    TexturedPipeline { render_pipeline, textures_bgl }
}

fn create_text_pipeline(device: &wgpu::Device) -> TextPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("text_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
    });

    let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("text_uniform_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let glyph_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("text_glyph_bgl"),
        entries: &[texture_entry(0), sampler_entry(1)],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("text_pipeline_layout"),
        bind_group_layouts: &[&uniform_bgl, &glyph_bgl],
        ..Default::default()
    });

    let render_pipeline = batch_pipeline(
        device,
        "text_glyphs",
        &shader,
        &layout,
        GlyphVertex::layout(),
        Topology::Triangles,
    );
    TextPipeline { render_pipeline, uniform_bgl, glyph_bgl }
}
