// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    match type_name.rfind(':') {
        Some(pos) => &type_name[(pos + 1)..],
        None => type_name,
    }
}

/// Typed uniform buffer holding a single `Content` value
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a new uniform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Update buffer content (skips the write if nothing changed)
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Array of `Content` values addressed with dynamic offsets
///
/// Each element occupies `stride` bytes, rounded up to the device's uniform
/// offset alignment, so element `i` binds at offset `i * stride`.
pub struct DynamicUniformArray<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl<Content: bytemuck::Pod> DynamicUniformArray<Content> {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<Content>() as u64, alignment);
        let capacity = capacity.max(1);

        Self {
            buffer: Self::create_buffer(device, stride, capacity),
            content_type: PhantomData,
            stride,
            capacity,
            staging: Vec::new(),
        }
    }

    fn create_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformArray<{}>", short_type_name::<Content>())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Uploads `data`; returns true when the buffer had to grow, which
    /// invalidates bind groups created against the old buffer
    pub fn update_data(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[Content]) -> bool {
        let mut grown = false;
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = Self::create_buffer(device, self.stride, self.capacity);
            grown = true;
        }
        if data.is_empty() {
            return grown;
        }

        let stride = self.stride as usize;
        let element = std::mem::size_of::<Content>();
        self.staging.clear();
        self.staging.resize(stride * data.len(), 0);
        for (i, item) in data.iter().enumerate() {
            self.staging[i * stride..i * stride + element].copy_from_slice(bytemuck::bytes_of(item));
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
        grown
    }

    /// Binding covering one element
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Content>() as u64),
        })
    }

    pub fn offset_of(&self, index: usize) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }
}

fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}
