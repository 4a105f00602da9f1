use cgmath::*;

use super::camera_utils::{Camera, CameraInput, OPENGL_TO_WGPU_MATRIX};
use crate::gfx::surface::SurfaceId;

/// A camera placed at an explicit position and aimed at a target
///
/// While control is attached, input orbits the eye around the target, pans
/// both together, or changes the distance between them. Y is up.
#[derive(Debug, Clone)]
pub struct FreeCamera {
    name: String,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: FreeCameraBounds,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    attached_to: Option<SurfaceId>,
    no_prevent_default: bool,
}

impl FreeCamera {
    /// Creates a camera at `position` looking down +Z
    pub fn new(name: &str, position: Vector3<f32>) -> Self {
        let mut camera = Self {
            name: name.to_string(),
            distance: 1.0,
            pitch: 0.0,
            yaw: 0.0,
            eye: position,
            target: position + Vector3::unit_z(),
            up: Vector3::unit_y(),
            bounds: FreeCameraBounds::default(),
            fovy: Rad(0.8),
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.005,
            pan_speed: 0.01,
            attached_to: None,
            no_prevent_default: false,
        };
        camera.sync_angles();
        camera
    }

    /// Aims the camera at `target`, keeping the eye where it is
    pub fn set_target(&mut self, target: Vector3<f32>) {
        if (target - self.eye).magnitude2() <= f32::EPSILON {
            return;
        }
        self.target = target;
        self.sync_angles();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether attached input leaves default host handling in place
    pub fn no_prevent_default(&self) -> bool {
        self.no_prevent_default
    }

    pub fn attached_surface(&self) -> Option<SurfaceId> {
        self.attached_to
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        self.update();
    }

    /// Pans the camera relative to the current view direction
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // keep the pan speed consistent across zoom levels
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Recomputes the eye after changing `distance`, `pitch` or `yaw`
    fn update(&mut self) {
        self.eye = calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    /// Derives `distance`, `pitch` and `yaw` from the current eye and target
    fn sync_angles(&mut self) {
        let offset = self.eye - self.target;
        self.distance = offset.magnitude().max(f32::EPSILON);
        self.pitch = (offset.y / self.distance)
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.yaw = offset.x.atan2(offset.z);
    }
}

impl Camera for FreeCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(Point3::from_vec(self.eye), Point3::from_vec(self.target), self.up)
    }

    fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, aspect.max(f32::EPSILON), self.znear, self.zfar)
    }

    fn attach_control(&mut self, surface: SurfaceId, no_prevent_default: bool) {
        self.attached_to = Some(surface);
        self.no_prevent_default = no_prevent_default;
        log::debug!("{} attached to surface {}", self.name, surface.raw());
    }

    fn detach_control(&mut self, surface: SurfaceId) {
        if self.attached_to == Some(surface) {
            self.attached_to = None;
            log::debug!("{} detached from surface {}", self.name, surface.raw());
        }
    }

    fn is_control_attached(&self) -> bool {
        self.attached_to.is_some()
    }

    fn process_input(&mut self, input: &CameraInput) {
        if self.attached_to.is_none() {
            return;
        }
        match *input {
            CameraInput::Rotate { dx, dy } => {
                self.add_yaw(-dx * self.rotate_speed);
                self.add_pitch(dy * self.rotate_speed);
            }
            CameraInput::Pan { dx, dy } => self.pan((-dx * self.pan_speed, dy * self.pan_speed)),
            CameraInput::Zoom(delta) => self.add_distance(delta),
        }
    }

    fn dispose(&mut self) {
        self.attached_to = None;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FreeCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for FreeCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(100.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.01,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.01,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_target_keeps_eye() {
        let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 5.0, -10.0));
        camera.set_target(Vector3::new(0.0, 0.0, 0.0));

        assert!((camera.eye - Vector3::new(0.0, 5.0, -10.0)).magnitude() < 1e-4);
        assert!((camera.distance - 125.0f32.sqrt()).abs() < 1e-4);

        // rebuilding the eye from the derived angles lands on the same spot
        camera.update();
        assert!((camera.eye - Vector3::new(0.0, 5.0, -10.0)).magnitude() < 1e-3);
    }

    #[test]
    fn test_input_ignored_while_detached() {
        let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 5.0, -10.0));
        camera.set_target(Vector3::new(0.0, 0.0, 0.0));
        let before = camera.eye;

        camera.process_input(&CameraInput::Rotate { dx: 50.0, dy: 0.0 });
        assert_eq!(camera.eye, before);

        let surface = SurfaceId::next();
        camera.attach_control(surface, true);
        camera.process_input(&CameraInput::Rotate { dx: 50.0, dy: 0.0 });
        assert_ne!(camera.eye, before);
        assert!(camera.no_prevent_default());
    }

    #[test]
    fn test_detach_only_from_attached_surface() {
        let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 0.0, -5.0));
        let surface = SurfaceId::next();
        camera.attach_control(surface, false);

        camera.detach_control(SurfaceId::next());
        assert!(camera.is_control_attached());

        camera.detach_control(surface);
        assert!(!camera.is_control_attached());
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 5.0, -10.0));
        camera.set_target(Vector3::new(0.0, 0.0, 0.0));

        let clip = camera.view_projection(1.5) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
