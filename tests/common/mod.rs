#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc, sync::Arc};

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use glint::{
    config::{HostCapabilities, HostOptions},
    gfx::{
        camera::{Camera, FreeCamera},
        device::headless::{CallLog, HeadlessDevice, HeadlessDeviceFactory, HeadlessSurface},
        geometry::{generate_ground, generate_sphere},
        scene::{Graph, HemisphericLight, Mesh, StandardMaterial},
        surface::{SurfaceId, SurfaceSize},
    },
    highlight::HoverStatus,
    host::{CameraLifecycle, CameraOptions, SceneHost},
    viewer::Viewer,
};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;

/// Camera that writes attach/detach/dispose into a call log
pub struct RecordingCamera {
    pub log: CallLog,
    pub attached: Option<SurfaceId>,
}

impl RecordingCamera {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            attached: None,
        }
    }
}

impl Camera for RecordingCamera {
    fn name(&self) -> &str {
        "recording"
    }
    fn eye(&self) -> Vector3<f32> {
        Vector3::new(0.0, 0.0, -10.0)
    }
    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::identity()
    }
    fn projection_matrix(&self, _aspect: f32) -> Matrix4<f32> {
        Matrix4::identity()
    }
    fn attach_control(&mut self, surface: SurfaceId, _no_prevent_default: bool) {
        self.attached = Some(surface);
        self.log.record("camera.attach");
    }
    fn detach_control(&mut self, surface: SurfaceId) {
        if self.attached == Some(surface) {
            self.attached = None;
            self.log.record("camera.detach");
        }
    }
    fn is_control_attached(&self) -> bool {
        self.attached.is_some()
    }
    fn dispose(&mut self) {
        self.log.record("camera.dispose");
    }
}

/// sphere1 (d=3) at the origin, sphere2 (d=2.5) at (1, 1, 0) in front of it
/// from the camera's point of view, and an unpickable ground below
pub fn build_scene(graph: &mut Graph) {
    let spheres = [("sphere1", 3.0, [0.0, 0.0, 0.0]), ("sphere2", 2.5, [1.0, 1.0, 0.0])];
    for (name, diameter, [x, y, z]) in spheres {
        let id = graph.add_object(name, Arc::new(Mesh::from_geometry(&generate_sphere(diameter, 32, 32))));
        graph.set_material(id, Some(StandardMaterial::new(name).into_ref()));
        if let Some(sphere) = graph.object_mut(id) {
            sphere.set_position(x, y, z);
        }
    }

    let ground = graph.add_object("ground", Arc::new(Mesh::from_geometry(&generate_ground(6.0, 6.0, 2))));
    graph.set_material(ground, Some(StandardMaterial::new("ground").into_ref()));
    if let Some(ground) = graph.object_mut(ground) {
        ground.pickable = false;
        ground.set_position(0.0, -1.5, 0.0);
    }

    graph.add_light(HemisphericLight::new("light1", Vector3::new(0.0, 1.0, 0.0)).with_intensity(0.7));
}

pub fn free_camera(_graph: &Graph) -> FreeCamera {
    let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 0.0, -10.0));
    camera.set_target(Vector3::new(0.0, 0.0, 0.0));
    camera
}

pub fn host(surface: &HeadlessSurface, options: HostOptions, log: &CallLog) -> SceneHost<HeadlessDevice> {
    let factory = HeadlessDeviceFactory::new(log.clone());
    SceneHost::new(Some(surface), &factory, options, HostCapabilities::default(), build_scene)
        .expect("headless host")
}

/// Hover statuses in publication order
pub type StatusLog = Rc<RefCell<Vec<HoverStatus>>>;

/// Viewer over the demo scene with a free camera looking at the origin
pub fn viewer(log: &CallLog) -> (Viewer<HeadlessDevice>, StatusLog) {
    viewer_with(HeadlessSurface::new(WIDTH, HEIGHT), HostOptions::default(), log)
}

pub fn viewer_with(surface: HeadlessSurface, options: HostOptions, log: &CallLog) -> (Viewer<HeadlessDevice>, StatusLog) {
    let statuses = StatusLog::default();
    let sink = statuses.clone();
    let viewer = Viewer::new(
        host(&surface, options, log),
        Box::new(move |status: &HoverStatus| sink.borrow_mut().push(status.clone())),
    )
    .with_camera(CameraLifecycle::new(free_camera, CameraOptions::default()));
    (viewer, statuses)
}

/// Drawing-buffer pixel `point` projects to through the active camera
pub fn screen_point(graph: &Graph, point: Vector3<f32>, size: SurfaceSize) -> (f32, f32) {
    let camera = graph.active_camera().expect("active camera");
    let clip = camera.view_projection(size.aspect()) * Vector4::new(point.x, point.y, point.z, 1.0);
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    (
        (ndc_x + 1.0) * 0.5 * size.width as f32,
        (1.0 - ndc_y) * 0.5 * size.height as f32,
    )
}

pub fn outlined_names(graph: &Graph) -> Vec<String> {
    graph
        .objects()
        .iter()
        .filter(|object| object.is_outlined())
        .map(|object| object.name.clone())
        .collect()
}
