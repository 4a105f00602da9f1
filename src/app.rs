use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::{HostCapabilities, HostOptions},
    error::{Error, Result},
    gfx::{
        camera::{Camera, CameraController},
        rendering::{WgpuDevice, WgpuDeviceFactory},
        scene::Graph,
        surface::WindowSurface,
    },
    host::{CameraLifecycle, CameraOptions, ResizeEvent, SceneHost},
    ui::{StatusBoard, StatusOverlay},
    viewer::Viewer,
};

/// Scene setup run once when the graph becomes ready
pub type SceneSetup = Box<dyn FnOnce(&mut Graph)>;

const CONTROLS_HINT: &str = "drag: orbit, shift+drag: pan, wheel: zoom, esc: quit";

/// Windowed viewer application
///
/// Opens one window, binds a wgpu device to it and drives a [`Viewer`] from
/// winit events.
pub struct GlintApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<WgpuDevice>>,
    title: String,
    options: HostOptions,
    scene_setup: Option<SceneSetup>,
    camera: Option<CameraLifecycle>,
    controller: CameraController,
    status: StatusBoard,
    error: Option<Error>,
}

impl GlintApp {
    /// Creates the application and its event loop
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| Error::EventLoop(e.to_string()))?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                viewer: None,
                title: "glint".to_string(),
                options: HostOptions::default(),
                scene_setup: None,
                camera: None,
                controller: CameraController::default(),
                status: StatusBoard::new(),
                error: None,
            },
        })
    }

    /// Builder pattern: Set the window title
    pub fn with_title(mut self, title: &str) -> Self {
        self.app_state.title = title.to_string();
        self
    }

    /// Builder pattern: Set host options
    pub fn with_options(mut self, options: HostOptions) -> Self {
        self.app_state.options = options;
        self
    }

    /// Builder pattern: Populate the graph once it is ready
    pub fn on_scene_ready<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut Graph) + 'static,
    {
        self.app_state.scene_setup = Some(Box::new(setup));
        self
    }

    /// Builder pattern: Create the camera from `factory`
    pub fn with_camera<C, F>(mut self, factory: F, options: CameraOptions) -> Self
    where
        C: Camera + 'static,
        F: FnMut(&Graph) -> C + 'static,
    {
        self.app_state.camera = Some(CameraLifecycle::new(factory, options));
        self
    }

    /// The board the hover status is published to
    pub fn status_board(&self) -> StatusBoard {
        self.app_state.status.clone()
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| Error::EventLoop("event loop already consumed".to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| Error::EventLoop(e.to_string()))?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn create_viewer(&mut self, window: Arc<Window>) -> Result<Viewer<WgpuDevice>> {
        let surface = WindowSurface::new(window.clone());
        let setup = self.scene_setup.take();

        let mut host = SceneHost::new(
            Some(&surface),
            &WgpuDeviceFactory,
            self.options,
            HostCapabilities::default(),
            move |graph| {
                if let Some(setup) = setup {
                    setup(graph);
                }
            },
        )?;

        let device = host.device();
        let overlay = StatusOverlay::new(
            device.device(),
            device.queue(),
            device.surface_format(),
            window,
            self.status.clone(),
        )
        .with_hint(CONTROLS_HINT);
        host.device_mut().set_overlay(Box::new(overlay));

        let mut viewer = Viewer::new(host, Box::new(self.status.clone()));
        if let Some(camera) = self.camera.take() {
            viewer = viewer.with_camera(camera);
        }
        Ok(viewer)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{error}");
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.teardown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1200, 800));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, Error::SurfaceCreation(e.to_string()));
                return;
            }
        };
        self.window = Some(window.clone());

        match self.create_viewer(window) {
            Ok(viewer) => self.viewer = Some(viewer),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // UI gets input first
        let captured = viewer
            .host_mut()
            .device_mut()
            .overlay_mut()
            .is_some_and(|overlay| overlay.handle_event(&event));
        if captured {
            window.request_redraw();
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                } = event
                {
                    self.shutdown(event_loop);
                    return;
                }
                self.controller.process_keyed_events(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                viewer.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                // pointer outside the surface picks nothing
                viewer.pointer_moved(-1.0, -1.0);
            }
            WindowEvent::Resized(size) => {
                let event = ResizeEvent {
                    size: size.into(),
                    scale_factor: window.scale_factor(),
                };
                if let Err(e) = viewer.resize(event) {
                    log::warn!("Resize render failed: {e}");
                }
            }
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = viewer.tick() {
                    log::warn!("Frame failed: {e}");
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        if let Some(input) = self.controller.translate(&event) {
            viewer.process_camera_input(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.teardown();
        }
    }
}
