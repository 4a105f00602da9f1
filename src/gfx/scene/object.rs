use std::sync::Arc;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};

use crate::gfx::{
    geometry::GeometryData,
    picking::AABB,
    scene::{material::MaterialRef, vertex::Vertex3D},
};

/// Stable identity of an object within its graph
///
/// Names are display labels and may repeat; ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Triangle mesh with its local-space bounds
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    bounds: AABB,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        let bounds = AABB::from_vertices(&positions);
        Self {
            vertices,
            indices,
            bounds,
        }
    }

    pub fn from_geometry(data: &GeometryData) -> Self {
        Self::new(data.to_vertices(), data.indices.clone())
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Local-space bounding box
    pub fn bounds(&self) -> AABB {
        self.bounds
    }
}

/// An object the graph renders and the picker can hit
pub struct RenderableObject {
    id: ObjectId,
    pub name: String,
    material: Option<MaterialRef>,
    /// Whether picks may return this object
    pub pickable: bool,
    pub visible: bool,
    pub position: Vector3<f32>,
    /// Euler rotation in radians, applied Y then X then Z
    pub rotation: Vector3<f32>,
    pub scaling: Vector3<f32>,
    mesh: Arc<Mesh>,
}

impl RenderableObject {
    pub(crate) fn new(id: ObjectId, name: &str, mesh: Arc<Mesh>) -> Self {
        Self {
            id,
            name: name.to_string(),
            material: None,
            pickable: true,
            visible: true,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scaling: Vector3::new(1.0, 1.0, 1.0),
            mesh,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn material(&self) -> Option<&MaterialRef> {
        self.material.as_ref()
    }

    pub fn set_material(&mut self, material: Option<MaterialRef>) {
        self.material = material;
    }

    /// True while a transient outline material is assigned
    pub fn is_outlined(&self) -> bool {
        self.material.as_ref().is_some_and(|m| m.is_outline())
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn set_mesh(&mut self, mesh: Arc<Mesh>) {
        self.mesh = mesh;
    }

    /// Builder-style position setter
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    /// Local-to-world transform
    pub fn world_matrix(&self) -> Matrix4<f32> {
        let rotation = Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let scale =
            Matrix4::from_nonuniform_scale(self.scaling.x, self.scaling.y, self.scaling.z);

        let world = Matrix4::from_translation(self.position) * rotation * scale;
        if world.is_invertible() {
            world
        } else {
            Matrix4::from_translation(self.position)
        }
    }

    /// World-space bounding box
    pub fn world_bounds(&self) -> AABB {
        self.mesh.bounds().transform(&self.world_matrix())
    }
}

/// Light blending a sky colour and a ground colour by surface orientation
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphericLight {
    pub name: String,
    /// Direction towards the sky
    pub direction: Vector3<f32>,
    pub intensity: f32,
    pub diffuse: [f32; 3],
    pub ground_color: [f32; 3],
}

impl HemisphericLight {
    pub fn new(name: &str, direction: Vector3<f32>) -> Self {
        Self {
            name: name.to_string(),
            direction,
            intensity: 1.0,
            diffuse: [1.0, 1.0, 1.0],
            ground_color: [0.0, 0.0, 0.0],
        }
    }

    /// Builder pattern: Set light intensity
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }
}
