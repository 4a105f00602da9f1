// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Typed uniform buffers and bind group shorthands.

pub mod binding_types;
pub mod uniform_buffer;

// Re-export main types
pub use uniform_buffer::{DynamicUniformArray, UniformBuffer};
