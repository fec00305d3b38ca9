use ambient_core::{Blend, Primitive, Vertex};
use wgpu;

pub static LINES_WGSL: &str = include_str!("../../shaders/lines.wgsl");
pub static POINTS_WGSL: &str = include_str!("../../shaders/points.wgsl");

/// Per-frame camera, scene transform and fog.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    pub(crate) proj: [[f32; 4]; 4],
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) fog: [f32; 4],
}

/// Per-mesh material values.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshUniforms {
    pub(crate) opacity: f32,
    pub(crate) point_size: f32,
    pub(crate) _pad: [f32; 2],
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn vertex_layout(step_mode: wgpu::VertexStepMode) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

pub(crate) fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn blend_state(blend: Blend) -> wgpu::BlendState {
    match blend {
        Blend::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        Blend::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

fn make_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    primitive: Primitive,
    blend: Blend,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let (topology, step_mode) = match primitive {
        Primitive::LineStrip => (wgpu::PrimitiveTopology::LineStrip, wgpu::VertexStepMode::Vertex),
        Primitive::Points => (
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::VertexStepMode::Instance,
        ),
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout(step_mode)],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(blend_state(blend)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

/// One pipeline per primitive and blend mode.
pub(crate) struct Pipelines {
    line_additive: wgpu::RenderPipeline,
    line_alpha: wgpu::RenderPipeline,
    point_additive: wgpu::RenderPipeline,
    point_alpha: wgpu::RenderPipeline,
}

impl Pipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        frame_bgl: &wgpu::BindGroupLayout,
        mesh_bgl: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let lines = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lines_shader"),
            source: wgpu::ShaderSource::Wgsl(LINES_WGSL.into()),
        });
        let points = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[frame_bgl, mesh_bgl],
            push_constant_ranges: &[],
        });
        let make = |shader, label, primitive, blend| {
            make_pipeline(device, &layout, shader, label, primitive, blend, color_format)
        };
        Self {
            line_additive: make(&lines, "line_additive", Primitive::LineStrip, Blend::Additive),
            line_alpha: make(&lines, "line_alpha", Primitive::LineStrip, Blend::Alpha),
            point_additive: make(&points, "point_additive", Primitive::Points, Blend::Additive),
            point_alpha: make(&points, "point_alpha", Primitive::Points, Blend::Alpha),
        }
    }

    pub(crate) fn get(&self, primitive: Primitive, blend: Blend) -> &wgpu::RenderPipeline {
        match (primitive, blend) {
            (Primitive::LineStrip, Blend::Additive) => &self.line_additive,
            (Primitive::LineStrip, Blend::Alpha) => &self.line_alpha,
            (Primitive::Points, Blend::Additive) => &self.point_additive,
            (Primitive::Points, Blend::Alpha) => &self.point_alpha,
        }
    }
}
