//! Render pipeline creation
//!
//! Both scene pipelines share one shader and one layout; they differ in
//! blending and depth writes.

use wgpu::*;

use crate::gfx::{resources::TextureResource, scene::vertex::Vertex3D};

/// Standard alpha blending for translucent materials
pub const ALPHA_BLENDING: BlendState = BlendState {
    color: BlendComponent {
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
        operation: BlendOperation::Add,
    },
    alpha: BlendComponent {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
        operation: BlendOperation::Add,
    },
};

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub format: TextureFormat,
    pub blend: BlendState,
    pub depth_write: bool,
    pub cull_mode: Option<Face>,
    pub sample_count: u32,
}

impl PipelineConfig {
    pub fn new(label: &str, format: TextureFormat) -> Self {
        Self {
            label: label.to_string(),
            format,
            blend: BlendState::REPLACE,
            depth_write: true,
            cull_mode: None,
            sample_count: 1,
        }
    }

    /// Blends over what is already drawn and leaves depth untouched
    pub fn translucent(mut self) -> Self {
        self.blend = ALPHA_BLENDING;
        self.depth_write = false;
        self
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }
}

pub fn create_pipeline(
    device: &Device,
    layout: &PipelineLayout,
    shader: &ShaderModule,
    config: &PipelineConfig,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(&config.label),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: config.format,
                blend: Some(config.blend),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: PipelineCompilationOptions::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: config.cull_mode,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: config.depth_write,
            depth_compare: CompareFunction::LessEqual,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState {
            count: config.sample_count,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}
