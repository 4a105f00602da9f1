//! # Glint Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use glint::prelude::*;
//! ```
//!
//! ```no_run
//! use glint::prelude::*;
//!
//! fn main() -> glint::Result<()> {
//!     GlintApp::new()?
//!         .on_scene_ready(|graph| {
//!             let mesh = Arc::new(Mesh::from_geometry(&generate_sphere(2.0, 32, 32)));
//!             graph.add_object("sphere", mesh);
//!             graph.add_light(HemisphericLight::new("light", Vector3::new(0.0, 1.0, 0.0)));
//!         })
//!         .with_camera(
//!             |_| FreeCamera::new("camera", Vector3::new(0.0, 0.0, -8.0)),
//!             CameraOptions::default(),
//!         )
//!         .run()
//! }
//! ```

// Application
pub use crate::{app::GlintApp, viewer::Viewer};

// Configuration and errors
pub use crate::config::{DeviceOptions, EngineOptions, HostCapabilities, HostOptions, SceneOptions};
pub use crate::error::{Error, Result};

// Scene
pub use crate::gfx::{
    camera::{Camera, CameraController, CameraInput, FreeCamera},
    geometry::{generate_box, generate_ground, generate_sphere},
    picking::{ObjectPicker, PickQuery, PickResult},
    scene::{
        Graph, HemisphericLight, Material, MaterialRef, Mesh, ObjectId, OutlineMaterial, RenderableObject,
        StandardMaterial,
    },
    surface::{SurfaceId, SurfaceSize},
};

// Lifecycle and highlighting
pub use crate::highlight::{HoverHighlightEngine, HoverStatus, StatusSink};
pub use crate::host::{CameraLifecycle, CameraOptions, ResizeEvent, SceneHost, TickOutcome};

// Common external types
pub use cgmath::Vector3;
pub use std::sync::Arc;
