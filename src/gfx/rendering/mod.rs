// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The wgpu render device, its pipelines and the per-frame overlay hook.

pub mod pipeline;
pub mod wgpu_device;

// Re-export main types
pub use pipeline::{PipelineConfig, ALPHA_BLENDING};
pub use wgpu_device::{FrameOverlay, WgpuDevice, WgpuDeviceFactory};
