//! # Scene Host
//!
//! Lifecycle glue between a device, its graph and the events that drive them.
//!
//! Three event sources interleave on one thread: render loop ticks, resize
//! notifications and pointer moves. None of them suspend, so every handler
//! runs to completion before the next event is delivered.
//!
//! Handlers never capture the scene. They receive a [`SceneContext`] that
//! borrows the device, the graph and the optional render hook for the
//! duration of one call.

pub mod camera_lifecycle;
pub mod ready;
pub mod render_loop;
pub mod resize;
pub mod scene_host;

pub use camera_lifecycle::{CameraLifecycle, CameraOptions, CameraState};
pub use ready::{Readiness, ReadySignal};
pub use render_loop::{render_scene, RenderLoopDriver, TickOutcome};
pub use resize::{
    CoordinatorState, ListenerHandle, ResizeCoordinator, ResizeEvent, ResizeListener, ResizeListeners,
    ResizeSource, SurfaceObserver, WindowListener,
};
pub use scene_host::SceneHost;

use crate::gfx::{
    device::{DeviceBinding, RenderDevice},
    scene::Graph,
};

/// Per-frame callback run before every render, including resize-forced ones
pub type RenderHook = Box<dyn FnMut(&mut Graph)>;

/// Everything a render or resize handler may touch, borrowed for one call
pub struct SceneContext<'a, D: RenderDevice> {
    pub device: &'a mut DeviceBinding<D>,
    pub graph: &'a mut Graph,
    pub on_render: Option<&'a mut RenderHook>,
}

impl<'a, D: RenderDevice> SceneContext<'a, D> {
    pub fn new(
        device: &'a mut DeviceBinding<D>,
        graph: &'a mut Graph,
        on_render: Option<&'a mut RenderHook>,
    ) -> Self {
        Self {
            device,
            graph,
            on_render,
        }
    }

    pub fn has_active_camera(&self) -> bool {
        self.graph.has_active_camera()
    }
}
