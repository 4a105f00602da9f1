//! Per-draw uniforms
//!
//! Every visible object gets one [`ObjectUniform`] slot in a dynamic-offset
//! buffer, bound to slot 1 at that object's offset.

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    gfx::scene::{Material, RenderableObject},
    wgpu_utils::{binding_types, uniform_buffer::DynamicUniformArray},
};

/// MUST match the `ObjectData` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    base_color: [f32; 4],
    ambient: [f32; 4], // rgb ambient, w = 1 when unlit
}

impl ObjectUniform {
    pub fn from_object(object: &RenderableObject) -> Self {
        let shading = object
            .material()
            .map(|material| material.shading())
            .unwrap_or_else(Material::default_shading);

        let model = object.world_matrix();
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        Self {
            model: model.into(),
            normal: normal.into(),
            base_color: shading.base_color,
            ambient: [
                shading.ambient_color[0],
                shading.ambient_color[1],
                shading.ambient_color[2],
                if shading.unlit { 1.0 } else { 0.0 },
            ],
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.base_color[3] < 1.0
    }
}

/// Dynamic-offset buffer of [`ObjectUniform`]s with its bind group
pub struct ObjectBindings {
    uniforms: DynamicUniformArray<ObjectUniform>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let uniforms = DynamicUniformArray::new(device, capacity);
        let bind_group_layout = binding_types::single_binding_layout(
            device,
            binding_types::dynamic_uniform(std::mem::size_of::<ObjectUniform>() as u64),
            "Object Bind Group Layout",
        );
        let bind_group = Self::create_bind_group(device, &bind_group_layout, &uniforms);

        Self {
            uniforms,
            bind_group_layout,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniforms: &DynamicUniformArray<ObjectUniform>,
    ) -> wgpu::BindGroup {
        binding_types::single_binding_group(device, layout, uniforms.binding_resource(), "Object Bind Group")
    }

    /// Uploads one uniform per draw, in draw order
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[ObjectUniform]) {
        if self.uniforms.update_data(device, queue, data) {
            self.bind_group = Self::create_bind_group(device, &self.bind_group_layout, &self.uniforms);
        }
    }

    pub fn offset_of(&self, index: usize) -> wgpu::DynamicOffset {
        self.uniforms.offset_of(index)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
