//! A scene host with a camera and hover highlighting on top
//!
//! [`Viewer`] owns the pieces that depend on each other's lifetimes and tears
//! them down in a fixed order:
//!
//! 1. hover highlighting is deregistered
//! 2. resize observation stops and the window listener is removed
//! 3. camera input is detached and the camera disposed
//! 4. the device is disposed

use crate::{
    error::Result,
    gfx::{
        camera::{CameraId, CameraInput},
        device::RenderDevice,
        picking::{ObjectPicker, PickQuery},
        scene::Graph,
    },
    highlight::{HoverHighlightEngine, HoverOutcome, StatusSink},
    host::{CameraLifecycle, ResizeEvent, ResizeSource, SceneHost, TickOutcome},
};

pub struct Viewer<D: RenderDevice, P: PickQuery = ObjectPicker> {
    host: SceneHost<D>,
    camera: Option<CameraLifecycle>,
    highlight: HoverHighlightEngine<P>,
    sink: Box<dyn StatusSink>,
    torn_down: bool,
}

impl<D: RenderDevice> Viewer<D, ObjectPicker> {
    pub fn new(host: SceneHost<D>, sink: Box<dyn StatusSink>) -> Self {
        Self::with_highlight(host, HoverHighlightEngine::new(), sink)
    }
}

impl<D: RenderDevice, P: PickQuery> Viewer<D, P> {
    pub fn with_highlight(host: SceneHost<D>, highlight: HoverHighlightEngine<P>, sink: Box<dyn StatusSink>) -> Self {
        let mut viewer = Self {
            host,
            camera: None,
            highlight,
            sink,
            torn_down: false,
        };
        viewer.adopt_snapshot();
        viewer
    }

    /// Hands the host's ready-time snapshot to the highlight engine
    fn adopt_snapshot(&mut self) {
        if self.highlight.snapshot().is_some() {
            return;
        }
        if let Some(snapshot) = self.host.hover_snapshot() {
            self.highlight.install_snapshot(snapshot.clone());
        }
    }

    /// Builder pattern: Let `lifecycle` provide the camera
    pub fn with_camera(mut self, lifecycle: CameraLifecycle) -> Self {
        self.camera = Some(lifecycle);
        self.sync_camera();
        self
    }

    fn sync_camera(&mut self) -> Option<CameraId> {
        if !self.host.should_render_children() {
            return None;
        }
        let surface = self.host.surface_id();
        let lifecycle = self.camera.as_mut()?;
        lifecycle.sync(Some(self.host.graph_mut()), surface)
    }

    /// One frame: readiness, camera, render
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.torn_down {
            return Ok(TickOutcome::Stopped);
        }

        self.host.poll_ready();
        self.adopt_snapshot();
        self.sync_camera();

        self.host.tick()
    }

    /// Handles a pointer move at physical surface position (`x`, `y`)
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Option<HoverOutcome> {
        if self.torn_down {
            return None;
        }

        let (x, y) = self.host.binding().to_buffer_coords(x, y);
        let viewport = self.host.device().drawing_buffer_size();
        self.highlight
            .pointer_moved(self.host.graph_mut(), x, y, viewport, self.sink.as_mut())
    }

    /// Delivers a size change to the window listener, then the surface observer
    ///
    /// Returns the number of frames rendered synchronously.
    pub fn resize(&mut self, event: ResizeEvent) -> Result<u32> {
        if self.torn_down {
            return Ok(0);
        }
        let window = self.host.handle_resize(ResizeSource::Window, event)?;
        let surface = self.host.handle_resize(ResizeSource::Surface, event)?;
        Ok(window + surface)
    }

    /// Forwards camera input to the active camera
    pub fn process_camera_input(&mut self, input: &CameraInput) {
        if let Some(camera) = self.host.graph_mut().active_camera_mut() {
            camera.process_input(input);
        }
    }

    /// Tears everything down in order. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.highlight.deregister();
        self.host.stop_observers();
        if let Some(lifecycle) = self.camera.as_mut() {
            lifecycle.teardown(Some(self.host.graph_mut()));
        }
        self.host.teardown();
        log::info!("Viewer torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn host(&self) -> &SceneHost<D> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut SceneHost<D> {
        &mut self.host
    }

    pub fn graph(&self) -> &Graph {
        self.host.graph()
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        self.host.graph_mut()
    }

    pub fn camera(&self) -> Option<&CameraLifecycle> {
        self.camera.as_ref()
    }

    pub fn highlight(&self) -> &HoverHighlightEngine<P> {
        &self.highlight
    }

    pub fn highlight_mut(&mut self) -> &mut HoverHighlightEngine<P> {
        &mut self.highlight
    }
}

impl<D: RenderDevice, P: PickQuery> Drop for Viewer<D, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
