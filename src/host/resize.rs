//! Resize coordination
//!
//! Two listeners react to size changes:
//!
//! - [`SurfaceObserver`] - surface-level notifications. Resizes the device and,
//!   when a camera is active, forces one synchronous render so no stale frame
//!   is shown while the surface is being dragged.
//! - [`WindowListener`] - window-level notifications for hosts without a
//!   surface observer. Resizes the device only.
//!
//! Listeners are stored in [`ResizeListeners`] and removed through the
//! [`ListenerHandle`] returned at registration.

use crate::{
    config::HostCapabilities,
    error::Result,
    gfx::{device::RenderDevice, surface::SurfaceSize},
};

use super::{render_loop::render_scene, SceneContext};

/// Where a size change was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSource {
    Surface,
    Window,
}

/// A new surface size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    pub size: SurfaceSize,
    pub scale_factor: f64,
}

impl ResizeEvent {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            scale_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// Reacts to one kind of size notification
pub trait ResizeListener<D: RenderDevice> {
    /// Returns true if a frame was rendered
    fn on_resize(&mut self, event: &ResizeEvent, ctx: &mut SceneContext<'_, D>) -> Result<bool>;
}

/// Resizes the device, then renders synchronously if a camera is active
#[derive(Debug, Default)]
pub struct SurfaceObserver;

impl<D: RenderDevice> ResizeListener<D> for SurfaceObserver {
    fn on_resize(&mut self, event: &ResizeEvent, ctx: &mut SceneContext<'_, D>) -> Result<bool> {
        ctx.device.resize_to(event.size, event.scale_factor);

        // expected while the camera is still being set up
        if !ctx.has_active_camera() {
            return Ok(false);
        }

        render_scene(ctx)?;
        Ok(true)
    }
}

/// Resizes the device only
#[derive(Debug, Default)]
pub struct WindowListener;

impl<D: RenderDevice> ResizeListener<D> for WindowListener {
    fn on_resize(&mut self, event: &ResizeEvent, ctx: &mut SceneContext<'_, D>) -> Result<bool> {
        ctx.device.resize_to(event.size, event.scale_factor);
        Ok(false)
    }
}

struct Registration<D: RenderDevice> {
    handle: ListenerHandle,
    source: ResizeSource,
    listener: Box<dyn ResizeListener<D>>,
}

/// Registered resize listeners, in registration order
pub struct ResizeListeners<D: RenderDevice> {
    entries: Vec<Registration<D>>,
    next_handle: u64,
}

impl<D: RenderDevice> Default for ResizeListeners<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 1,
        }
    }
}

impl<D: RenderDevice> ResizeListeners<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: ResizeSource, listener: Box<dyn ResizeListener<D>>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Registration {
            handle,
            source,
            listener,
        });
        handle
    }

    /// Returns false if the handle was not registered
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Runs every listener registered for `source`; returns the number of
    /// frames rendered
    pub fn dispatch(
        &mut self,
        source: ResizeSource,
        event: &ResizeEvent,
        ctx: &mut SceneContext<'_, D>,
    ) -> Result<u32> {
        let mut rendered = 0;
        for entry in self.entries.iter_mut().filter(|entry| entry.source == source) {
            if entry.listener.on_resize(event, ctx)? {
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handle: ListenerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }
}

/// Whether surface-level observation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Observing,
}

/// Owns the resize listeners for one scene host
pub struct ResizeCoordinator<D: RenderDevice> {
    listeners: ResizeListeners<D>,
    surface_observer: Option<ListenerHandle>,
    window_listener: Option<ListenerHandle>,
}

impl<D: RenderDevice> ResizeCoordinator<D> {
    /// Registers the window listener, and the surface observer when the host
    /// supports it and `observe` is set
    pub fn start(observe: bool, capabilities: &HostCapabilities) -> Self {
        let mut listeners = ResizeListeners::new();

        let surface_observer = if observe && capabilities.surface_observer {
            Some(listeners.register(ResizeSource::Surface, Box::new(SurfaceObserver)))
        } else {
            log::debug!(
                "Surface resize observation off (requested: {}, supported: {})",
                observe,
                capabilities.surface_observer
            );
            None
        };
        let window_listener = Some(listeners.register(ResizeSource::Window, Box::new(WindowListener)));

        Self {
            listeners,
            surface_observer,
            window_listener,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        if self.surface_observer.is_some() {
            CoordinatorState::Observing
        } else {
            CoordinatorState::Idle
        }
    }

    pub fn has_window_listener(&self) -> bool {
        self.window_listener.is_some()
    }

    pub fn listeners(&self) -> &ResizeListeners<D> {
        &self.listeners
    }

    /// Registers an extra listener alongside the built-in ones
    pub fn register(&mut self, source: ResizeSource, listener: Box<dyn ResizeListener<D>>) -> ListenerHandle {
        self.listeners.register(source, listener)
    }

    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    /// Delivers a size change; returns the number of frames rendered
    pub fn handle(&mut self, source: ResizeSource, event: &ResizeEvent, ctx: &mut SceneContext<'_, D>) -> Result<u32> {
        self.listeners.dispatch(source, event, ctx)
    }

    /// Stops surface observation, then removes the window listener
    pub fn stop(&mut self) {
        if let Some(handle) = self.surface_observer.take() {
            self.listeners.remove(handle);
            log::debug!("Surface resize observation stopped");
        }
        if let Some(handle) = self.window_listener.take() {
            self.listeners.remove(handle);
            log::debug!("Window resize listener removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::EngineOptions,
        gfx::{
            camera::FreeCamera,
            device::{
                headless::{CallLog, HeadlessDevice, HeadlessDeviceFactory, HeadlessSurface},
                DeviceBinding,
            },
            scene::Graph,
        },
    };
    use cgmath::Vector3;

    fn binding(log: &CallLog) -> DeviceBinding<HeadlessDevice> {
        let surface = HeadlessSurface::new(320, 240);
        let factory = HeadlessDeviceFactory::new(log.clone());
        DeviceBinding::create(Some(&surface), &factory, &EngineOptions::default()).unwrap()
    }

    #[test]
    fn test_observer_requires_support_and_opt_in() {
        let supported = HostCapabilities::default();
        let unsupported = HostCapabilities {
            surface_observer: false,
        };

        let coordinator = ResizeCoordinator::<HeadlessDevice>::start(true, &supported);
        assert_eq!(coordinator.state(), CoordinatorState::Observing);
        assert_eq!(coordinator.listeners().len(), 2);

        let coordinator = ResizeCoordinator::<HeadlessDevice>::start(false, &supported);
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert!(coordinator.has_window_listener());

        let coordinator = ResizeCoordinator::<HeadlessDevice>::start(true, &unsupported);
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert_eq!(coordinator.listeners().len(), 1);
    }

    #[test]
    fn test_surface_resize_renders_only_with_camera() {
        let log = CallLog::new();
        let mut device = binding(&log);
        let mut graph = Graph::default();
        let mut coordinator = ResizeCoordinator::start(true, &HostCapabilities::default());
        let event = ResizeEvent::new(640, 480, 1.0);

        let rendered = coordinator
            .handle(ResizeSource::Surface, &event, &mut SceneContext::new(&mut device, &mut graph, None))
            .unwrap();
        assert_eq!(rendered, 0);
        assert_eq!(log.count("device.resize 640x480"), 1);
        assert_eq!(log.count("device.render"), 0);

        graph.add_camera(Box::new(FreeCamera::new("camera", Vector3::new(0.0, 0.0, -5.0))));
        let event = ResizeEvent::new(800, 600, 1.0);
        let rendered = coordinator
            .handle(ResizeSource::Surface, &event, &mut SceneContext::new(&mut device, &mut graph, None))
            .unwrap();
        assert_eq!(rendered, 1);

        let resize = log.position("device.resize 800x600").unwrap();
        let render = log.position("device.render").unwrap();
        assert!(resize < render);
    }

    #[test]
    fn test_window_listener_never_renders() {
        let log = CallLog::new();
        let mut device = binding(&log);
        let mut graph = Graph::default();
        graph.add_camera(Box::new(FreeCamera::new("camera", Vector3::new(0.0, 0.0, -5.0))));
        let mut coordinator = ResizeCoordinator::start(true, &HostCapabilities::default());

        let rendered = coordinator
            .handle(
                ResizeSource::Window,
                &ResizeEvent::new(1024, 768, 1.0),
                &mut SceneContext::new(&mut device, &mut graph, None),
            )
            .unwrap();
        assert_eq!(rendered, 0);
        assert_eq!(log.count("device.resize 1024x768"), 1);
        assert_eq!(log.count("device.render"), 0);
    }

    #[test]
    fn test_stop_removes_both_listeners() {
        let mut coordinator = ResizeCoordinator::<HeadlessDevice>::start(true, &HostCapabilities::default());
        coordinator.stop();
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert!(!coordinator.has_window_listener());
        assert!(coordinator.listeners().is_empty());

        coordinator.stop();
        assert!(coordinator.listeners().is_empty());
    }
}
