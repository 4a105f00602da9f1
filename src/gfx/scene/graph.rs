//! The scene graph
//!
//! A [`Graph`] owns the renderable objects, the lights and the cameras of one
//! scene, and is the single place material assignments live.

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{
    config::SceneOptions,
    gfx::{
        camera::{Camera, CameraId},
        scene::{
            material::MaterialRef,
            object::{HemisphericLight, Mesh, ObjectId, RenderableObject},
            observable::Observable,
        },
    },
};

/// Identifies one graph instance
///
/// A graph replaced by a new one gets a new generation, which is how camera
/// ownership notices the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphGeneration(u64);

impl GraphGeneration {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A pending resource load; the graph is ready once every ticket is finished
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct Graph {
    generation: GraphGeneration,
    options: SceneOptions,
    objects: Vec<RenderableObject>,
    lights: Vec<HemisphericLight>,
    cameras: Vec<(CameraId, Box<dyn Camera>)>,
    active_camera: Option<CameraId>,
    next_object: u64,
    next_camera: u64,
    next_load: u64,
    pending_loads: BTreeSet<u64>,
    pointer_x: f32,
    pointer_y: f32,
    on_before_render: Observable<Graph>,
    on_after_render: Observable<Graph>,
}

impl Graph {
    pub fn new(options: SceneOptions) -> Self {
        let generation = GraphGeneration::next();
        log::debug!("graph {:?} created", generation);
        Self {
            generation,
            options,
            objects: Vec::new(),
            lights: Vec::new(),
            cameras: Vec::new(),
            active_camera: None,
            next_object: 1,
            next_camera: 1,
            next_load: 1,
            pending_loads: BTreeSet::new(),
            pointer_x: 0.0,
            pointer_y: 0.0,
            on_before_render: Observable::new(),
            on_after_render: Observable::new(),
        }
    }

    pub fn generation(&self) -> GraphGeneration {
        self.generation
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    // Objects

    /// Adds an object built from `mesh`; names need not be unique
    pub fn add_object(&mut self, name: &str, mesh: Arc<Mesh>) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.push(RenderableObject::new(id, name, mesh));
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&RenderableObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut RenderableObject> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    /// Objects in insertion order
    pub fn objects(&self) -> &[RenderableObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut RenderableObject> {
        self.objects.iter_mut()
    }

    /// First object carrying `name`
    pub fn find_by_name(&self, name: &str) -> Option<&RenderableObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<RenderableObject> {
        let index = self.objects.iter().position(|object| object.id() == id)?;
        Some(self.objects.remove(index))
    }

    /// Assigns a material; returns false if `id` is not in the graph
    pub fn set_material(&mut self, id: ObjectId, material: Option<MaterialRef>) -> bool {
        match self.object_mut(id) {
            Some(object) => {
                object.set_material(material);
                true
            }
            None => false,
        }
    }

    // Lights

    pub fn add_light(&mut self, light: HemisphericLight) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[HemisphericLight] {
        &self.lights
    }

    // Cameras

    /// Registers a camera; it becomes active if no camera is active yet
    pub fn add_camera(&mut self, camera: Box<dyn Camera>) -> CameraId {
        let id = CameraId(self.next_camera);
        self.next_camera += 1;
        log::debug!("camera '{}' added to graph", camera.name());
        self.cameras.push((id, camera));
        if self.active_camera.is_none() {
            self.active_camera = Some(id);
        }
        id
    }

    /// Removes a camera without disposing it
    ///
    /// If it was active, the first remaining camera becomes active.
    pub fn remove_camera(&mut self, id: CameraId) -> Option<Box<dyn Camera>> {
        let index = self.cameras.iter().position(|(camera_id, _)| *camera_id == id)?;
        let (_, camera) = self.cameras.remove(index);
        if self.active_camera == Some(id) {
            self.active_camera = self.cameras.first().map(|(camera_id, _)| *camera_id);
        }
        Some(camera)
    }

    pub fn camera(&self, id: CameraId) -> Option<&(dyn Camera + 'static)> {
        self.cameras
            .iter()
            .find(|(camera_id, _)| *camera_id == id)
            .map(|(_, camera)| camera.as_ref())
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut (dyn Camera + 'static)> {
        self.cameras
            .iter_mut()
            .find(|(camera_id, _)| *camera_id == id)
            .map(|(_, camera)| camera.as_mut())
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn active_camera_id(&self) -> Option<CameraId> {
        self.active_camera
    }

    pub fn active_camera(&self) -> Option<&(dyn Camera + 'static)> {
        self.camera(self.active_camera?)
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut (dyn Camera + 'static)> {
        let id = self.active_camera?;
        self.camera_mut(id)
    }

    /// Makes `id` active; returns false if it is not registered
    pub fn set_active_camera(&mut self, id: CameraId) -> bool {
        if self.camera(id).is_some() {
            self.active_camera = Some(id);
            true
        } else {
            false
        }
    }

    pub fn has_active_camera(&self) -> bool {
        self.active_camera.is_some()
    }

    // Readiness

    /// Marks a resource load as in flight; the graph stops being ready
    pub fn begin_load(&mut self) -> LoadTicket {
        let id = self.next_load;
        self.next_load += 1;
        self.pending_loads.insert(id);
        LoadTicket(id)
    }

    pub fn finish_load(&mut self, ticket: LoadTicket) {
        self.pending_loads.remove(&ticket.0);
    }

    /// True once no resource load is pending
    pub fn is_ready(&self) -> bool {
        self.pending_loads.is_empty()
    }

    pub fn pending_loads(&self) -> usize {
        self.pending_loads.len()
    }

    // Pointer

    /// Records the last pointer position in drawing-buffer pixels
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer_x = x;
        self.pointer_y = y;
    }

    pub fn pointer(&self) -> (f32, f32) {
        (self.pointer_x, self.pointer_y)
    }

    // Render observers

    /// Observers run before every render of this graph
    pub fn on_before_render(&mut self) -> &mut Observable<Graph> {
        &mut self.on_before_render
    }

    /// Observers run after every render of this graph
    pub fn on_after_render(&mut self) -> &mut Observable<Graph> {
        &mut self.on_after_render
    }

    pub(crate) fn notify_before_render(&mut self) {
        let mut observers = std::mem::take(&mut self.on_before_render);
        observers.notify(self);
        let detached = std::mem::replace(&mut self.on_before_render, observers);
        self.on_before_render.absorb(detached);
    }

    pub(crate) fn notify_after_render(&mut self) {
        let mut observers = std::mem::take(&mut self.on_after_render);
        observers.notify(self);
        let detached = std::mem::replace(&mut self.on_after_render, observers);
        self.on_after_render.absorb(detached);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(SceneOptions::default())
    }
}

impl Drop for Graph {
    fn drop(&mut self) {
        // cameras still registered go down with the scene
        for (_, camera) in self.cameras.iter_mut() {
            camera.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{camera::FreeCamera, geometry::generate_sphere};
    use cgmath::Vector3;
    use std::{cell::Cell, rc::Rc};

    fn sphere() -> Arc<Mesh> {
        Arc::new(Mesh::from_geometry(&generate_sphere(1.0, 8, 6)))
    }

    #[test]
    fn test_duplicate_names_get_distinct_ids() {
        let mut graph = Graph::default();
        let a = graph.add_object("sphere", sphere());
        let b = graph.add_object("sphere", sphere());

        assert_ne!(a, b);
        assert_eq!(graph.find_by_name("sphere").map(|o| o.id()), Some(a));
        assert!(graph.remove_object(a).is_some());
        assert_eq!(graph.find_by_name("sphere").map(|o| o.id()), Some(b));
    }

    #[test]
    fn test_first_camera_becomes_active() {
        let mut graph = Graph::default();
        assert!(!graph.has_active_camera());

        let first = graph.add_camera(Box::new(FreeCamera::new("a", Vector3::new(0.0, 0.0, -5.0))));
        let second = graph.add_camera(Box::new(FreeCamera::new("b", Vector3::new(0.0, 0.0, 5.0))));
        assert_eq!(graph.active_camera_id(), Some(first));

        graph.remove_camera(first);
        assert_eq!(graph.active_camera_id(), Some(second));

        graph.remove_camera(second);
        assert!(!graph.has_active_camera());
    }

    #[test]
    fn test_readiness_follows_loads() {
        let mut graph = Graph::default();
        assert!(graph.is_ready());

        let mesh = graph.begin_load();
        let texture = graph.begin_load();
        graph.finish_load(mesh);
        assert!(!graph.is_ready());
        graph.finish_load(texture);
        assert!(graph.is_ready());
    }

    #[test]
    fn test_generations_differ() {
        assert_ne!(Graph::default().generation(), Graph::default().generation());
    }

    #[test]
    fn test_observer_can_remove_itself_during_notify() {
        let mut graph = Graph::default();
        let calls = Rc::new(Cell::new(0));
        let handle = Rc::new(Cell::new(None));

        let counter = calls.clone();
        let own_handle = handle.clone();
        let registered = graph.on_before_render().add(move |graph: &mut Graph| {
            counter.set(counter.get() + 1);
            if let Some(handle) = own_handle.get() {
                graph.on_before_render().remove(handle);
            }
        });
        handle.set(Some(registered));

        graph.notify_before_render();
        graph.notify_before_render();

        assert_eq!(calls.get(), 1);
        assert!(graph.on_before_render().is_empty());
    }

    #[test]
    fn test_observer_added_during_notify_runs_next_time() {
        let mut graph = Graph::default();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        graph.on_after_render().add_once(move |graph: &mut Graph| {
            let counter = counter.clone();
            graph
                .on_after_render()
                .add(move |_: &mut Graph| counter.set(counter.get() + 1));
        });

        graph.notify_after_render();
        assert_eq!(calls.get(), 0);
        graph.notify_after_render();
        assert_eq!(calls.get(), 1);
    }
}
