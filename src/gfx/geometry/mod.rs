//! # Procedural Geometry Generation
//!
//! Functions that generate the primitive shapes scene setup code builds its
//! objects from, so no model files are needed for basic shapes.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: UV sphere with a given diameter and resolution
//! - **Ground**: Flat, subdivided plane lying in the XZ plane (Y-up)
//! - **Box**: Axis-aligned cube with per-face normals
//!
//! ## Usage
//!
//! ```rust
//! use glint::gfx::geometry::{generate_box, generate_ground, generate_sphere};
//!
//! let sphere = generate_sphere(3.0, 32, 16);
//! let ground = generate_ground(6.0, 6.0, 1);
//! let cube = generate_box(1.0);
//! assert!(sphere.triangle_count() > 0);
//! # let _ = (ground, cube);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry ready to become a mesh
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}
