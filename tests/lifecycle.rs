mod common;

use std::{cell::Cell, rc::Rc};

use common::{host, viewer, viewer_with, RecordingCamera, HEIGHT, WIDTH};
use glint::{
    config::HostOptions,
    gfx::device::headless::{CallLog, HeadlessSurface},
    highlight::HoverStatus,
    host::{CameraLifecycle, CameraOptions, CoordinatorState, ResizeEvent, TickOutcome},
    viewer::Viewer,
};

#[test]
fn teardown_detaches_camera_before_disposing_device() {
    let log = CallLog::new();
    let camera_log = log.clone();
    let surface = HeadlessSurface::new(WIDTH, HEIGHT);
    let mut viewer = Viewer::new(host(&surface, HostOptions::default(), &log), Box::new(|_: &HoverStatus| {}))
        .with_camera(CameraLifecycle::new(
            move |_| RecordingCamera::new(&camera_log),
            CameraOptions::default(),
        ));
    assert_eq!(log.count("camera.attach"), 1);

    viewer.teardown();

    let detach = log.position("camera.detach").unwrap();
    let dispose = log.position("camera.dispose").unwrap();
    let device = log.position("device.dispose").unwrap();
    assert!(detach < dispose && dispose < device);
    assert!(!viewer.highlight().is_registered());
    assert_eq!(viewer.host().resize_state(), CoordinatorState::Idle);
    assert!(viewer.pointer_moved(10.0, 10.0).is_none());
    assert_eq!(viewer.tick().unwrap(), TickOutcome::Stopped);

    let entries = log.entries().len();
    viewer.teardown();
    drop(viewer);
    assert_eq!(log.entries().len(), entries);
}

#[test]
fn camera_without_auto_attach_is_only_disposed() {
    let log = CallLog::new();
    let camera_log = log.clone();
    let surface = HeadlessSurface::new(WIDTH, HEIGHT);
    let mut viewer = Viewer::new(host(&surface, HostOptions::default(), &log), Box::new(|_: &HoverStatus| {}))
        .with_camera(CameraLifecycle::new(
            move |_| RecordingCamera::new(&camera_log),
            CameraOptions::default().with_auto_attach(false),
        ));

    viewer.teardown();
    assert_eq!(log.count("camera.attach"), 0);
    assert_eq!(log.count("camera.detach"), 0);
    assert_eq!(log.count("camera.dispose"), 1);
}

#[test]
fn resize_renders_once_with_a_camera() {
    let log = CallLog::new();
    let (mut viewer, _) = viewer(&log);

    let rendered = viewer.resize(ResizeEvent::new(800, 600, 1.0)).unwrap();
    assert_eq!(rendered, 1);
    assert_eq!(log.count("device.render"), 1);

    let entries = log.entries();
    let last_resize = entries.iter().rposition(|e| e == "device.resize 800x600").unwrap();
    let render = log.position("device.render").unwrap();
    assert!(last_resize < render);
}

#[test]
fn resize_without_camera_is_silent() {
    let log = CallLog::new();
    let surface = HeadlessSurface::new(WIDTH, HEIGHT);
    let mut viewer = Viewer::new(host(&surface, HostOptions::default(), &log), Box::new(|_: &HoverStatus| {}));

    let rendered = viewer.resize(ResizeEvent::new(800, 600, 1.0)).unwrap();
    assert_eq!(rendered, 0);
    assert!(log.count("device.resize 800x600") >= 1);
    assert_eq!(log.count("device.render"), 0);
}

#[test]
fn resize_without_surface_observation_only_resizes() {
    let log = CallLog::new();
    let options = HostOptions::default().with_observe_canvas_resize(false);
    let (mut viewer, _) = viewer_with(HeadlessSurface::new(WIDTH, HEIGHT), options, &log);

    assert_eq!(viewer.host().resize_state(), CoordinatorState::Idle);
    assert_eq!(viewer.resize(ResizeEvent::new(800, 600, 1.0)).unwrap(), 0);
    assert_eq!(log.count("device.resize 800x600"), 1);
    assert_eq!(log.count("device.render"), 0);
}

#[test]
fn tick_without_camera_warns_and_keeps_going() {
    let log = CallLog::new();
    let surface = HeadlessSurface::new(WIDTH, HEIGHT);
    let mut viewer = Viewer::new(host(&surface, HostOptions::default(), &log), Box::new(|_: &HoverStatus| {}));

    assert_eq!(viewer.tick().unwrap(), TickOutcome::SkippedNoCamera);
    assert_eq!(viewer.host().render_loop().missing_camera_warnings(), 1);
    assert!(viewer.host().render_loop().is_running());
    assert_eq!(log.count("device.render"), 0);

    let camera = common::free_camera(viewer.graph());
    viewer.graph_mut().add_camera(Box::new(camera));
    assert_eq!(viewer.tick().unwrap(), TickOutcome::Rendered);
    assert_eq!(viewer.host().render_loop().missing_camera_warnings(), 1);
    assert_eq!(log.count("device.render"), 1);
}

#[test]
fn render_hook_and_observers_run_for_ticks_and_resizes() {
    let log = CallLog::new();
    let (mut viewer, _) = viewer(&log);

    let hook_calls = Rc::new(Cell::new(0));
    let hook_counter = hook_calls.clone();
    viewer
        .host_mut()
        .set_render_hook(move |_| hook_counter.set(hook_counter.get() + 1));

    let before = Rc::new(Cell::new(0));
    let after = Rc::new(Cell::new(0));
    let once = Rc::new(Cell::new(0));
    let (b, a, o) = (before.clone(), after.clone(), once.clone());
    viewer.graph_mut().on_before_render().add(move |_| b.set(b.get() + 1));
    let after_handle = viewer.graph_mut().on_after_render().add(move |_| a.set(a.get() + 1));
    viewer.graph_mut().on_before_render().add_once(move |_| o.set(o.get() + 1));

    viewer.tick().unwrap();
    viewer.resize(ResizeEvent::new(800, 600, 1.0)).unwrap();
    viewer.tick().unwrap();

    assert_eq!(hook_calls.get(), 3);
    assert_eq!(before.get(), 3);
    assert_eq!(after.get(), 3);
    assert_eq!(once.get(), 1);

    assert!(viewer.graph_mut().on_after_render().remove(after_handle));
    viewer.tick().unwrap();
    assert_eq!(after.get(), 3);
    assert_eq!(before.get(), 4);
}

#[test]
fn pointer_coordinates_follow_the_drawing_buffer() {
    let log = CallLog::new();
    let surface = HeadlessSurface::new(WIDTH, HEIGHT).with_scale_factor(2.0);
    let options = HostOptions::default().with_engine(
        glint::config::EngineOptions::default().with_adapt_to_device_ratio(false),
    );
    let (mut viewer, _) = viewer_with(surface, options, &log);

    let outcome = viewer
        .pointer_moved(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0)
        .unwrap();
    assert_eq!(viewer.graph().pointer(), (WIDTH as f32 / 4.0, HEIGHT as f32 / 4.0));
    assert_eq!(outcome.status.hovered_name(), Some("sphere1"));
}
