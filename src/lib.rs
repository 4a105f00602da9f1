// src/lib.rs
//! Glint 3D Viewer
//!
//! A wgpu + winit scene viewer that outlines whichever object the pointer is
//! hovering over.
//!
//! The pieces, from the bottom up:
//!
//! - [`gfx`] - surfaces, devices, the scene graph, cameras and picking
//! - [`host`] - device/graph lifecycle, resize handling and the render loop
//! - [`highlight`] - the pointer-move state machine applying the outline
//! - [`viewer`] - host, camera and highlighting composed with ordered teardown
//! - [`app`] - a windowed application driving a viewer from winit events

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod highlight;
pub mod host;
pub mod prelude;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GlintApp;
pub use error::{Error, Result};
pub use viewer::Viewer;

/// Initialises `env_logger`, honouring `RUST_LOG` when set
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("glint=info,wgpu=warn,naga=warn");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialised");
    }
}
