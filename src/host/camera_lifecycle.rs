//! Camera creation and teardown
//!
//! A [`CameraLifecycle`] creates its camera from a caller-supplied factory
//! once a graph is available, optionally attaches input control to the
//! surface, and on teardown detaches control before disposing the camera.
//!
//! Re-creation is driven by the graph's [`GraphGeneration`]. A camera created
//! in one graph must be released with [`CameraLifecycle::release`] before
//! `sync` will create one in another, so two cameras never hold input at once.

use crate::gfx::{
    camera::{Camera, CameraId},
    scene::{Graph, GraphGeneration},
    surface::SurfaceId,
};

/// How the camera is wired to its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraOptions {
    /// Attach input control to the surface on creation
    pub auto_attach: bool,
    /// Let input events keep their default host behaviour
    pub no_prevent_default: bool,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            auto_attach: true,
            no_prevent_default: true,
        }
    }
}

impl CameraOptions {
    /// Builder pattern: Enable or disable automatic input attachment
    pub fn with_auto_attach(mut self, auto_attach: bool) -> Self {
        self.auto_attach = auto_attach;
        self
    }

    /// Builder pattern: Set whether default input handling is kept
    pub fn with_no_prevent_default(mut self, no_prevent_default: bool) -> Self {
        self.no_prevent_default = no_prevent_default;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Uncreated,
    Attached {
        camera: CameraId,
        generation: GraphGeneration,
        /// Surface holding input control, if it was attached
        attached_to: Option<SurfaceId>,
    },
    TornDown,
}

type CameraFactory = Box<dyn FnMut(&Graph) -> Box<dyn Camera>>;

pub struct CameraLifecycle {
    factory: CameraFactory,
    options: CameraOptions,
    state: CameraState,
    created: u32,
}

impl CameraLifecycle {
    pub fn new<C, F>(mut factory: F, options: CameraOptions) -> Self
    where
        C: Camera + 'static,
        F: FnMut(&Graph) -> C + 'static,
    {
        Self {
            factory: Box::new(move |graph| Box::new(factory(graph))),
            options,
            state: CameraState::Uncreated,
            created: 0,
        }
    }

    /// Like [`CameraLifecycle::new`] for factories that already box their camera
    pub fn from_boxed(factory: CameraFactory, options: CameraOptions) -> Self {
        Self {
            factory,
            options,
            state: CameraState::Uncreated,
            created: 0,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    /// Number of times the factory has been invoked
    pub fn created(&self) -> u32 {
        self.created
    }

    pub fn camera_id(&self) -> Option<CameraId> {
        match self.state {
            CameraState::Attached { camera, .. } => Some(camera),
            _ => None,
        }
    }

    /// Ensures a camera exists for `graph` and returns it
    ///
    /// Returns `None` while there is no graph, while the camera of a previous
    /// graph has not been released, and forever after
    /// [`CameraLifecycle::teardown`].
    pub fn sync(&mut self, graph: Option<&mut Graph>, surface: SurfaceId) -> Option<CameraId> {
        let Some(graph) = graph else {
            if self.state == CameraState::Uncreated {
                log::warn!("cannot create camera (scene not ready)");
            }
            return None;
        };

        match self.state {
            CameraState::TornDown => return None,
            CameraState::Attached { camera, generation, .. } if generation == graph.generation() => {
                if graph.camera(camera).is_some() {
                    return Some(camera);
                }
                log::warn!("Camera {} was removed from the scene behind its owner", camera.raw());
                self.state = CameraState::Uncreated;
            }
            CameraState::Attached { camera, .. } => {
                // the old camera still holds input; release it first
                log::warn!(
                    "Camera {} still belongs to a previous graph, release it before syncing a new one",
                    camera.raw()
                );
                return None;
            }
            CameraState::Uncreated => {}
        }

        Some(self.create(graph, surface))
    }

    fn create(&mut self, graph: &mut Graph, surface: SurfaceId) -> CameraId {
        let mut camera = (self.factory)(graph);
        self.created += 1;

        let attached_to = if self.options.auto_attach {
            camera.attach_control(surface, self.options.no_prevent_default);
            Some(surface)
        } else {
            None
        };

        let name = camera.name().to_string();
        let id = graph.add_camera(camera);
        if !graph.set_active_camera(id) {
            log::warn!("Camera '{}' could not be made active", name);
        }
        log::info!("Camera '{}' created (input attached: {})", name, attached_to.is_some());

        self.state = CameraState::Attached {
            camera: id,
            generation: graph.generation(),
            attached_to,
        };
        id
    }

    /// Detaches and disposes the camera living in `graph`, leaving the
    /// lifecycle ready to create a fresh one
    ///
    /// Call this with the old graph before replacing it.
    pub fn release(&mut self, graph: &mut Graph) {
        if matches!(self.state, CameraState::Attached { .. }) {
            self.dispose_camera(Some(graph));
            self.state = CameraState::Uncreated;
        }
    }

    /// Final teardown: detach input, then dispose the camera
    ///
    /// The graph may already be gone; the camera then went down with it.
    pub fn teardown(&mut self, graph: Option<&mut Graph>) {
        if self.state == CameraState::TornDown {
            return;
        }
        self.dispose_camera(graph);
        self.state = CameraState::TornDown;
    }

    fn dispose_camera(&mut self, graph: Option<&mut Graph>) {
        let CameraState::Attached {
            camera,
            generation,
            attached_to,
        } = self.state
        else {
            return;
        };

        let Some(graph) = graph.filter(|graph| graph.generation() == generation) else {
            log::debug!("Camera {} outlived its graph", camera.raw());
            return;
        };

        if let (Some(surface), Some(attached)) = (attached_to, graph.camera_mut(camera)) {
            attached.detach_control(surface);
        }
        if let Some(mut removed) = graph.remove_camera(camera) {
            removed.dispose();
            log::info!("Camera '{}' disposed", removed.name());
        }
    }
}
