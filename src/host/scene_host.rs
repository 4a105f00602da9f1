//! The scene component: device, graph, resize handling and render loop
//! created together and torn down together.

use crate::{
    config::{HostCapabilities, HostOptions},
    error::Result,
    gfx::{
        device::{DeviceBinding, DeviceFactory, RenderDevice},
        scene::Graph,
        surface::{RenderSurface, SurfaceId},
    },
    highlight::HoverSnapshot,
};

use super::{
    ready::ReadySignal,
    render_loop::{RenderLoopDriver, TickOutcome},
    resize::{CoordinatorState, ResizeCoordinator, ResizeEvent, ResizeSource},
    RenderHook, SceneContext,
};

/// Owns one device and the graph rendered through it
///
/// Construction order is device, graph, resize listeners, ready
/// subscription, render loop. [`SceneHost::teardown`] stops the observers
/// and then disposes the device.
///
/// The scene becomes ready once the graph's loads are done, the ready
/// callback has run and any loads that callback started have finished too.
/// The hover snapshot is taken at that moment.
pub struct SceneHost<D: RenderDevice> {
    graph: Graph,
    device: DeviceBinding<D>,
    resize: ResizeCoordinator<D>,
    render_loop: RenderLoopDriver,
    ready: ReadySignal<Graph>,
    scene_ready: bool,
    snapshot: Option<HoverSnapshot>,
    on_render: Option<RenderHook>,
    options: HostOptions,
    torn_down: bool,
}

impl<D: RenderDevice> SceneHost<D> {
    /// Binds a device to `surface` and creates the graph
    ///
    /// `on_scene_ready` runs exactly once: immediately if the graph is ready
    /// on creation, otherwise on the first poll that sees it ready.
    ///
    /// # Errors
    /// Fails with [`crate::Error::SurfaceUnavailable`] when `surface` is
    /// `None`; nothing is retried.
    pub fn new<S, F, R>(
        surface: Option<&S>,
        factory: &F,
        options: HostOptions,
        capabilities: HostCapabilities,
        on_scene_ready: R,
    ) -> Result<Self>
    where
        S: RenderSurface,
        F: DeviceFactory<S, Device = D>,
        R: FnOnce(&mut Graph) + 'static,
    {
        Self::with_preparation(surface, factory, options, capabilities, |_| {}, on_scene_ready)
    }

    /// Like [`SceneHost::new`], running `prepare` on the fresh graph before
    /// readiness is checked
    ///
    /// Loads begun in `prepare` hold back `on_scene_ready` until they finish.
    pub fn with_preparation<S, F, P, R>(
        surface: Option<&S>,
        factory: &F,
        options: HostOptions,
        capabilities: HostCapabilities,
        prepare: P,
        on_scene_ready: R,
    ) -> Result<Self>
    where
        S: RenderSurface,
        F: DeviceFactory<S, Device = D>,
        P: FnOnce(&mut Graph),
        R: FnOnce(&mut Graph) + 'static,
    {
        let device = DeviceBinding::create(surface, factory, &options.engine)?;
        let graph = Graph::new(options.scene);
        let resize = ResizeCoordinator::start(options.observe_canvas_resize, &capabilities);

        let mut host = Self {
            graph,
            device,
            resize,
            render_loop: RenderLoopDriver::new(),
            ready: ReadySignal::new(),
            scene_ready: false,
            snapshot: None,
            on_render: None,
            options,
            torn_down: false,
        };

        prepare(&mut host.graph);
        host.ready.subscribe(&mut host.graph, on_scene_ready);
        if !host.poll_ready() {
            log::debug!("Scene waiting for {} loads", host.graph.pending_loads());
        }

        host.render_loop.start();
        Ok(host)
    }

    /// Sets the hook run before every render
    pub fn set_render_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Graph) + 'static,
    {
        self.on_render = Some(Box::new(hook));
    }

    pub fn clear_render_hook(&mut self) {
        self.on_render = None;
    }

    /// Advances readiness once the graph has no pending loads
    ///
    /// The first poll that sees the graph ready runs the ready callback. The
    /// scene turns ready when no loads remain after it, and the hover
    /// snapshot is captured right then. Returns true only on the poll that
    /// made the scene ready.
    pub fn poll_ready(&mut self) -> bool {
        if self.scene_ready || !self.graph.is_ready() {
            return false;
        }
        if self.ready.notify(&mut self.graph) && !self.graph.is_ready() {
            log::debug!("Scene setup started {} loads", self.graph.pending_loads());
            return false;
        }

        let snapshot = HoverSnapshot::capture(&self.graph);
        log::info!("Scene ready ({} objects)", snapshot.len());
        self.snapshot = Some(snapshot);
        self.scene_ready = true;
        true
    }

    pub fn is_scene_ready(&self) -> bool {
        self.scene_ready
    }

    /// Original materials captured when the scene became ready
    pub fn hover_snapshot(&self) -> Option<&HoverSnapshot> {
        self.snapshot.as_ref()
    }

    /// Whether children may render yet, honouring `render_children_when_ready`
    pub fn should_render_children(&self) -> bool {
        !self.options.render_children_when_ready || self.is_scene_ready()
    }

    /// Delivers a size change to the listeners registered for `source`
    ///
    /// Returns the number of frames rendered synchronously.
    pub fn handle_resize(&mut self, source: ResizeSource, event: ResizeEvent) -> Result<u32> {
        if self.torn_down {
            return Ok(0);
        }
        let mut ctx = SceneContext::new(&mut self.device, &mut self.graph, self.on_render.as_mut());
        self.resize.handle(source, &event, &mut ctx)
    }

    /// One render loop tick
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.torn_down {
            return Ok(TickOutcome::Stopped);
        }
        self.poll_ready();
        let mut ctx = SceneContext::new(&mut self.device, &mut self.graph, self.on_render.as_mut());
        self.render_loop.tick(&mut ctx)
    }

    /// Stops resize observation, removes the window listener and stops the loop
    pub fn stop_observers(&mut self) {
        self.resize.stop();
        self.render_loop.stop();
    }

    /// Disposes the device; must be the last teardown step
    pub fn dispose_device(&mut self) -> bool {
        self.device.dispose()
    }

    /// Stops everything and disposes the device. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.stop_observers();
        self.dispose_device();
        self.torn_down = true;
        log::info!("Scene host for surface {} torn down", self.device.surface_id().raw());
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn binding(&self) -> &DeviceBinding<D> {
        &self.device
    }

    pub fn device(&self) -> &D {
        self.device.device()
    }

    pub fn device_mut(&mut self) -> &mut D {
        self.device.device_mut()
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.device.surface_id()
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    pub fn resize_state(&self) -> CoordinatorState {
        self.resize.state()
    }

    pub fn resize_coordinator_mut(&mut self) -> &mut ResizeCoordinator<D> {
        &mut self.resize
    }

    pub fn render_loop(&self) -> &RenderLoopDriver {
        &self.render_loop
    }
}

impl<D: RenderDevice> Drop for SceneHost<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        gfx::{
            device::headless::{CallLog, HeadlessDevice, HeadlessDeviceFactory, HeadlessSurface},
            geometry::generate_sphere,
            scene::Mesh,
        },
    };
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
        sync::Arc,
    };

    fn sphere() -> Arc<Mesh> {
        Arc::new(Mesh::from_geometry(&generate_sphere(1.0, 8, 8)))
    }

    fn host_with(
        options: HostOptions,
        ready: impl FnOnce(&mut Graph) + 'static,
    ) -> (SceneHost<HeadlessDevice>, CallLog) {
        let log = CallLog::new();
        let surface = HeadlessSurface::new(320, 240);
        let factory = HeadlessDeviceFactory::new(log.clone());
        let host = SceneHost::new(Some(&surface), &factory, options, HostCapabilities::default(), ready).unwrap();
        (host, log)
    }

    #[test]
    fn test_missing_surface_aborts_construction() {
        let factory = HeadlessDeviceFactory::new(CallLog::new());
        let result = SceneHost::new(
            None::<&HeadlessSurface>,
            &factory,
            HostOptions::default(),
            HostCapabilities::default(),
            |_| {},
        );
        assert!(matches!(result, Err(Error::SurfaceUnavailable)));
        assert!(factory.log().is_empty());
    }

    #[test]
    fn test_ready_graph_fires_immediately() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let (mut host, _) = host_with(HostOptions::default(), move |graph| {
            counter.set(counter.get() + 1);
            graph.add_object("sphere", sphere());
        });

        assert_eq!(fired.get(), 1);
        assert!(host.is_scene_ready());
        assert_eq!(host.hover_snapshot().map(|s| s.len()), Some(1));
        assert!(!host.poll_ready());
        assert_eq!(host.tick().unwrap(), TickOutcome::SkippedNoCamera);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_prepared_loads_defer_the_ready_callback() {
        let log = CallLog::new();
        let surface = HeadlessSurface::new(320, 240);
        let factory = HeadlessDeviceFactory::new(log.clone());
        let ticket = Rc::new(RefCell::new(None));
        let slot = ticket.clone();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();

        let mut host = SceneHost::with_preparation(
            Some(&surface),
            &factory,
            HostOptions::default().with_render_children_when_ready(true),
            HostCapabilities::default(),
            move |graph| *slot.borrow_mut() = Some(graph.begin_load()),
            move |graph| {
                counter.set(counter.get() + 1);
                graph.add_object("loaded", sphere());
            },
        )
        .unwrap();

        assert_eq!(fired.get(), 0);
        assert!(!host.is_scene_ready());
        assert!(!host.should_render_children());
        assert!(host.hover_snapshot().is_none());

        host.tick().unwrap();
        assert!(!host.poll_ready());
        assert_eq!(fired.get(), 0);

        let pending = ticket.borrow_mut().take().unwrap();
        host.graph_mut().finish_load(pending);
        assert!(host.poll_ready());
        assert_eq!(fired.get(), 1);
        assert!(host.is_scene_ready());
        assert!(host.should_render_children());
        assert_eq!(host.hover_snapshot().map(|s| s.len()), Some(1));

        assert!(!host.poll_ready());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_loads_started_by_setup_hold_back_readiness() {
        let ticket = Rc::new(RefCell::new(None));
        let slot = ticket.clone();
        let options = HostOptions::default().with_render_children_when_ready(true);
        let (mut host, _) = host_with(options, move |graph| {
            graph.add_object("placeholder", sphere());
            *slot.borrow_mut() = Some(graph.begin_load());
        });

        assert!(!host.is_scene_ready());
        assert!(!host.should_render_children());
        assert!(host.hover_snapshot().is_none());

        // the load finishes by adding its mesh
        host.graph_mut().add_object("imported", sphere());
        let pending = ticket.borrow_mut().take().unwrap();
        host.graph_mut().finish_load(pending);

        assert!(host.poll_ready());
        assert!(host.should_render_children());
        assert_eq!(host.hover_snapshot().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_teardown_stops_then_disposes_once() {
        let (mut host, log) = host_with(HostOptions::default(), |_| {});
        assert_eq!(host.resize_state(), CoordinatorState::Observing);

        host.teardown();
        host.teardown();
        assert_eq!(host.resize_state(), CoordinatorState::Idle);
        assert!(!host.render_loop().is_running());
        assert_eq!(log.count("device.dispose"), 1);
        assert_eq!(host.tick().unwrap(), TickOutcome::Stopped);

        drop(host);
        assert_eq!(log.count("device.dispose"), 1);
    }
}
