// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Render targets, uniform buffers and bind groups used by the wgpu device.

pub mod global_bindings;
pub mod object_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform, MAX_LIGHTS};
pub use object_bindings::{ObjectBindings, ObjectUniform};
pub use texture_resource::TextureResource;
