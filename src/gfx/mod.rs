//! # Graphics Module
//!
//! Everything between a drawable surface and a finished frame.
//!
//! ## Architecture Overview
//!
//! - **Surfaces** ([`surface`]) - drawable regions and their sizes
//! - **Devices** ([`device`]) - the device trait, surface binding and an offscreen recording device
//! - **Rendering** ([`rendering`]) - the wgpu device, pipelines and the scene shader
//! - **Scene Graph** ([`scene`]) - objects, materials, lights, cameras and render observers
//! - **Camera System** ([`camera`]) - the camera trait, a free camera and input translation
//! - **Picking** ([`picking`]) - ray casts from screen coordinates into the graph
//! - **Geometry** ([`geometry`]) - procedural sphere, ground and box meshes
//! - **Resources** ([`resources`]) - uniform layouts and GPU textures
//!
//! ## Usage
//!
//! ```
//! use glint::gfx::{geometry::generate_sphere, scene::{Graph, Mesh}};
//! use std::sync::Arc;
//!
//! let mut graph = Graph::default();
//! let sphere = Arc::new(Mesh::from_geometry(&generate_sphere(2.0, 32, 32)));
//! let id = graph.add_object("sphere", sphere);
//! assert_eq!(graph.object(id).map(|o| o.name.as_str()), Some("sphere"));
//! ```

pub mod camera;
pub mod device;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use camera::FreeCamera;
pub use device::{DeviceBinding, RenderDevice};
pub use rendering::WgpuDevice;
pub use scene::Graph;
