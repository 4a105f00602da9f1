//! Texture resource management for wgpu
//!
//! Render targets that follow the drawing buffer: the depth buffer and, when
//! antialiasing is on, the multisampled colour target resolved into the
//! swapchain image.

use crate::gfx::surface::SurfaceSize;

/// GPU texture together with its default view
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the drawing buffer
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `size` - Drawing buffer size
    /// * `sample_count` - Must match the colour target's sample count
    /// * `label` - Debug label for the texture
    pub fn create_depth_texture(
        device: &wgpu::Device,
        size: SurfaceSize,
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create_target(device, size, sample_count, Self::DEPTH_FORMAT, label)
    }

    /// Creates the multisampled colour target for antialiased rendering
    pub fn create_msaa_target(
        device: &wgpu::Device,
        size: SurfaceSize,
        sample_count: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self::create_target(device, size, sample_count, format, "msaa_color_target")
    }

    fn create_target(
        device: &wgpu::Device,
        size: SurfaceSize,
        sample_count: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}
