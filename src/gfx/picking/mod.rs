//! # Object Picking System
//!
//! Finds the object under a screen position by casting a ray from the active
//! camera through the pointer.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: Unproject drawing-buffer coordinates into a world-space ray
//! 2. **Broad phase**: Reject objects whose world bounding box the ray misses
//! 3. **Narrow phase**: Intersect the ray with the mesh triangles in object space
//! 4. **Selection**: Return the closest hit
//!
//! Only objects that are both pickable and visible take part; the others
//! neither match nor occlude.
//!
//! ## Usage
//!
//! ```rust
//! use glint::gfx::{picking::{ObjectPicker, PickQuery}, scene::Graph, surface::SurfaceSize};
//!
//! let graph = Graph::default();
//! let mut picker = ObjectPicker::new();
//! // without an active camera nothing can be picked
//! assert!(picker.pick(&graph, 10.0, 10.0, SurfaceSize::new(640, 480)).is_none());
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::{
    camera::Camera,
    scene::{Graph, ObjectId, RenderableObject},
    surface::SurfaceSize,
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Ray through drawing-buffer pixel (`x`, `y`) of a `viewport` seen by `camera`
    pub fn from_screen(camera: &dyn Camera, x: f32, y: f32, viewport: SurfaceSize) -> Option<Self> {
        if viewport.is_empty() {
            return None;
        }
        let width = viewport.width as f32;
        let height = viewport.height as f32;

        // Convert screen coordinates to normalized device coordinates (-1 to 1)
        let ndc_x = (2.0 * x) / width - 1.0;
        let ndc_y = 1.0 - (2.0 * y) / height; // Flip Y axis

        let inv_view_proj = camera.view_projection(viewport.aspect()).invert()?;

        // wgpu clip space puts the near plane at z = 0
        let near = unproject(&inv_view_proj, Vector4::new(ndc_x, ndc_y, 0.0, 1.0));
        let far = unproject(&inv_view_proj, Vector4::new(ndc_x, ndc_y, 1.0, 1.0));

        let direction = far - near;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(Self::new(near, direction))
    }

    /// The ray expressed in the space `matrix` maps into, not renormalized
    fn transformed(&self, matrix: &Matrix4<f32>) -> (Vector3<f32>, Vector3<f32>) {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        (origin.truncate() / origin.w, direction.truncate())
    }
}

fn unproject(inverse: &Matrix4<f32>, point: Vector4<f32>) -> Vector3<f32> {
    let world = inverse * point;
    world.truncate() / world.w
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::new(first[0], first[1], first[2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform all 8 corners of the AABB and compute new bounds
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| {
                let p = matrix * corner.extend(1.0);
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();

        Self::from_vertices(&transformed)
    }
}

/// Result of an object picking operation
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub object: ObjectId,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Answers "what is under this pixel"
///
/// Coordinates are drawing-buffer pixels with the origin at the top left.
pub trait PickQuery {
    fn pick(&mut self, graph: &Graph, x: f32, y: f32, viewport: SurfaceSize) -> Option<PickResult>;
}

/// Ray-cast picker against the graph's active camera
#[derive(Debug)]
pub struct ObjectPicker {
    /// When false, bounding boxes alone decide hits
    pub triangle_test: bool,
}

impl ObjectPicker {
    pub fn new() -> Self {
        Self {
            triangle_test: true,
        }
    }

    /// Closest hit of `ray` against the pickable objects of `graph`
    pub fn pick_ray(&self, graph: &Graph, ray: &Ray) -> Option<PickResult> {
        let mut closest: Option<PickResult> = None;

        for object in graph.objects().iter().filter(|o| o.pickable && o.visible) {
            let Some(broad) = object.world_bounds().intersect_ray(ray) else {
                continue;
            };

            let distance = if self.triangle_test {
                match intersect_mesh(object, ray) {
                    Some(distance) => distance,
                    None => continue,
                }
            } else {
                broad
            };

            if closest
                .as_ref()
                .map_or(true, |result| distance < result.distance)
            {
                closest = Some(PickResult {
                    object: object.id(),
                    distance,
                    intersection_point: ray.point_at(distance),
                });
            }
        }

        closest
    }
}

impl Default for ObjectPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl PickQuery for ObjectPicker {
    fn pick(&mut self, graph: &Graph, x: f32, y: f32, viewport: SurfaceSize) -> Option<PickResult> {
        let camera = graph.active_camera()?;
        let ray = Ray::from_screen(camera, x, y, viewport)?;
        self.pick_ray(graph, &ray)
    }
}

/// World-space distance to the nearest triangle of `object` hit by `ray`
fn intersect_mesh(object: &RenderableObject, ray: &Ray) -> Option<f32> {
    let world = object.world_matrix();
    let inverse = world.invert()?;
    let (origin, direction) = ray.transformed(&inverse);

    let mesh = object.mesh();
    let vertices = mesh.vertices();
    let mut nearest: Option<f32> = None;

    for triangle in mesh.indices().chunks_exact(3) {
        let corner = |i: u32| -> Option<Vector3<f32>> {
            vertices.get(i as usize).map(|v| Vector3::from(v.position))
        };
        let (Some(a), Some(b), Some(c)) = (corner(triangle[0]), corner(triangle[1]), corner(triangle[2])) else {
            continue;
        };

        if let Some(t) = intersect_triangle(origin, direction, a, b, c) {
            if nearest.map_or(true, |n| t < n) {
                nearest = Some(t);
            }
        }
    }

    // parameter along the local ray -> world distance
    nearest.map(|t| {
        let local_hit = origin + direction * t;
        let world_hit = world * local_hit.extend(1.0);
        (world_hit.truncate() / world_hit.w - ray.origin).magnitude()
    })
}

/// Moller-Trumbore; double-sided, returns the ray parameter
fn intersect_triangle(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::FreeCamera,
        geometry::{generate_ground, generate_sphere},
        scene::Mesh,
    };
    use std::sync::Arc;

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        // Ray hitting the box
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        // Ray missing the box
        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    fn graph_with_camera() -> Graph {
        let mut graph = Graph::default();
        let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 0.0, -10.0));
        camera.set_target(Vector3::new(0.0, 0.0, 0.0));
        graph.add_camera(Box::new(camera));
        graph
    }

    #[test]
    fn test_center_pixel_hits_sphere() {
        let mut graph = graph_with_camera();
        let sphere = graph.add_object(
            "sphere1",
            Arc::new(Mesh::from_geometry(&generate_sphere(2.0, 16, 12))),
        );

        let mut picker = ObjectPicker::new();
        let viewport = SurfaceSize::new(200, 100);
        let hit = picker.pick(&graph, 100.0, 50.0, viewport).map(|r| r.object);
        assert_eq!(hit, Some(sphere));

        // distance is eye to front surface, less the near plane offset
        let result = picker.pick(&graph, 100.0, 50.0, viewport);
        assert!(result.is_some_and(|r| (r.distance - 8.9).abs() < 0.1));

        assert!(picker.pick(&graph, 2.0, 2.0, viewport).is_none());
    }

    #[test]
    fn test_unpickable_objects_neither_match_nor_occlude() {
        let mut graph = graph_with_camera();
        let wall = graph.add_object(
            "wall",
            Arc::new(Mesh::from_geometry(&generate_ground(20.0, 20.0, 1))),
        );
        if let Some(wall) = graph.object_mut(wall) {
            // stand the plane up between the camera and the sphere
            wall.rotation.x = std::f32::consts::FRAC_PI_2;
            wall.set_position(0.0, 0.0, -3.0);
            wall.pickable = false;
        }
        let sphere = graph.add_object(
            "sphere1",
            Arc::new(Mesh::from_geometry(&generate_sphere(2.0, 16, 12))),
        );

        let mut picker = ObjectPicker::new();
        let hit = picker.pick(&graph, 50.0, 50.0, SurfaceSize::new(100, 100));
        assert_eq!(hit.map(|r| r.object), Some(sphere));
    }

    #[test]
    fn test_closest_object_wins() {
        let mut graph = graph_with_camera();
        let mesh = Arc::new(Mesh::from_geometry(&generate_sphere(2.0, 16, 12)));
        let far = graph.add_object("far", mesh.clone());
        if let Some(far) = graph.object_mut(far) {
            far.set_position(0.0, 0.0, 4.0);
        }
        let near = graph.add_object("near", mesh);

        let mut picker = ObjectPicker::new();
        let hit = picker.pick(&graph, 50.0, 50.0, SurfaceSize::new(100, 100));
        assert_eq!(hit.map(|r| r.object), Some(near));
    }
}
