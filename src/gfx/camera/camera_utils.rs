use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::surface::SurfaceId;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Identity of a camera registered with a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub(crate) u64);

impl CameraId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Device-independent camera input, produced by
/// [`CameraController`](super::CameraController) from window events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraInput {
    /// Orbit around the target
    Rotate { dx: f32, dy: f32 },
    /// Move eye and target together in the view plane
    Pan { dx: f32, dy: f32 },
    /// Positive values move away from the target
    Zoom(f32),
}

/// A viewpoint the graph can render from
///
/// Input control is attached to a surface explicitly and must be detached
/// symmetrically before the camera is disposed.
pub trait Camera {
    fn name(&self) -> &str;

    /// World-space eye position
    fn eye(&self) -> Vector3<f32>;

    fn view_matrix(&self) -> Matrix4<f32>;

    /// Projection into wgpu clip space (depth 0..1)
    fn projection_matrix(&self, aspect: f32) -> Matrix4<f32>;

    fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Starts consuming input delivered for `surface`
    fn attach_control(&mut self, surface: SurfaceId, no_prevent_default: bool);

    /// Stops consuming input for `surface`; a no-op if attached elsewhere
    fn detach_control(&mut self, surface: SurfaceId);

    fn is_control_attached(&self) -> bool;

    /// Applies one input step; ignored while control is detached
    fn process_input(&mut self, _input: &CameraInput) {}

    /// Releases whatever the camera holds. Called exactly once by its owner.
    fn dispose(&mut self) {}
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &dyn Camera, aspect: f32) -> Self {
        let eye = camera.eye();
        Self {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view_proj: convert_matrix4_to_array(camera.view_projection(aspect)),
        }
    }
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
