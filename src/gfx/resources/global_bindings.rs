//! Global uniform bindings for camera and scene data
//!
//! Per-frame state shared by every draw: the camera matrices, the scene
//! ambient colour and up to [`MAX_LIGHTS`] hemispheric lights. Bound to
//! slot 0 in the scene pipelines.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::HemisphericLight},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Lights beyond this count are ignored by the shader
pub const MAX_LIGHTS: usize = 4;

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    light_count: [u32; 4],
    light_direction: [[f32; 4]; MAX_LIGHTS], // xyz direction, w intensity
    light_diffuse: [[f32; 4]; MAX_LIGHTS],
    light_ground: [[f32; 4]; MAX_LIGHTS],
}
// 64 + 16 + 16 + 16 + 3 * 64 = 304 bytes

impl GlobalUniform {
    pub fn new(camera: CameraUniform, ambient: [f32; 3], lights: &[HemisphericLight]) -> Self {
        let mut content = Self {
            view_proj: camera.view_proj,
            eye: camera.view_position,
            ambient: [ambient[0], ambient[1], ambient[2], 1.0],
            light_count: [0; 4],
            light_direction: [[0.0; 4]; MAX_LIGHTS],
            light_diffuse: [[0.0; 4]; MAX_LIGHTS],
            light_ground: [[0.0; 4]; MAX_LIGHTS],
        };

        if lights.len() > MAX_LIGHTS {
            log::debug!("{} lights in scene, shading the first {}", lights.len(), MAX_LIGHTS);
        }
        for (i, light) in lights.iter().take(MAX_LIGHTS).enumerate() {
            let d = light.direction;
            content.light_direction[i] = [d.x, d.y, d.z, light.intensity];
            content.light_diffuse[i] = [light.diffuse[0], light.diffuse[1], light.diffuse[2], 1.0];
            content.light_ground[i] = [
                light.ground_color[0],
                light.ground_color[1],
                light.ground_color[2],
                1.0,
            ];
            content.light_count[0] = i as u32 + 1;
        }

        content
    }

    pub fn light_count(&self) -> u32 {
        self.light_count[0]
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout =
            binding_types::single_binding_layout(device, binding_types::uniform(), "Globals Bind Group Layout");
        let bind_group = binding_types::single_binding_group(
            device,
            &bind_group_layout,
            ubo.binding_resource(),
            "Global Bind Group",
        );

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
