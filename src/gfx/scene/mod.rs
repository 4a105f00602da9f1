//! # Scene Management Module
//!
//! The scene graph and everything it holds: renderable objects with their
//! meshes and material assignments, hemispheric lights, cameras, and the
//! before/after render observers.
//!
//! ## Key Components
//!
//! - [`Graph`] - Owns objects, lights and cameras; tracks readiness
//! - [`RenderableObject`] - A named, optionally pickable mesh with a material
//! - [`Material`] - Standard materials and the transient outline material
//! - [`Observable`] - Callbacks notified around each render
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use glint::gfx::{geometry::generate_sphere, scene::{Graph, Mesh, StandardMaterial}};
//!
//! let mut graph = Graph::default();
//! let id = graph.add_object("sphere1", Arc::new(Mesh::from_geometry(&generate_sphere(3.0, 32, 16))));
//! graph.set_material(id, Some(StandardMaterial::new("red").with_diffuse(1.0, 0.0, 0.0).into_ref()));
//! assert!(graph.object(id).is_some());
//! ```

pub mod graph;
pub mod material;
pub mod object;
pub mod observable;
pub mod vertex;

// Re-export main types
pub use graph::{Graph, GraphGeneration, LoadTicket};
pub use material::{Material, MaterialRef, OutlineMaterial, Shading, StandardMaterial};
pub use object::{HemisphericLight, Mesh, ObjectId, RenderableObject};
pub use observable::{Observable, ObserverHandle};
pub use vertex::Vertex3D;
