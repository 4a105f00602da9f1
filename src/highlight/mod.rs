//! # Hover Highlighting
//!
//! Outlines whichever object the pointer is over.
//!
//! Every pointer move runs the same sequence against the graph:
//!
//! 1. pick at the pointer position
//! 2. restore every object recorded in the [`HoverSnapshot`] to its original material
//! 3. if a pickable object was hit, give it a fresh outline material
//! 4. publish a [`HoverStatus`] to the status sink
//!
//! Because step 2 resets everything first, at most one object carries an
//! outline after any pointer move. The snapshot is captured once, when the
//! scene becomes ready, and never contains an outline material.
//!
//! ```
//! use glint::gfx::scene::{Graph, OutlineMaterial};
//! use glint::highlight::{HoverHighlightEngine, HoverStatus};
//!
//! let mut graph = Graph::default();
//! let mut engine = HoverHighlightEngine::new().with_style(OutlineMaterial::new([0.0, 1.0, 0.0], 0.5));
//! engine.capture_snapshot(&graph);
//!
//! let mut last = HoverStatus::NotHovering;
//! let size = glint::gfx::surface::SurfaceSize::new(640, 480);
//! engine.pointer_moved(&mut graph, 10.0, 10.0, size, &mut |status: &HoverStatus| last = status.clone());
//! assert_eq!(last.to_string(), "not hovering over any");
//! ```

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::gfx::{
    picking::{ObjectPicker, PickQuery},
    scene::{Graph, MaterialRef, ObjectId, OutlineMaterial},
    surface::SurfaceSize,
};

/// What the pointer is over after a pointer move
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HoverStatus {
    Hovering(String),
    #[default]
    NotHovering,
}

impl HoverStatus {
    pub fn hovered_name(&self) -> Option<&str> {
        match self {
            HoverStatus::Hovering(name) => Some(name),
            HoverStatus::NotHovering => None,
        }
    }
}

impl fmt::Display for HoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoverStatus::Hovering(name) => write!(f, "hovering over {name}"),
            HoverStatus::NotHovering => write!(f, "not hovering over any"),
        }
    }
}

/// Receives the hover status once per pointer move, synchronously
pub trait StatusSink {
    fn publish(&mut self, status: &HoverStatus);
}

impl<F> StatusSink for F
where
    F: FnMut(&HoverStatus),
{
    fn publish(&mut self, status: &HoverStatus) {
        self(status)
    }
}

/// Original materials, keyed by object identity
///
/// Captured once and never refreshed. Objects added to the graph afterwards
/// have no entry.
#[derive(Debug, Clone, Default)]
pub struct HoverSnapshot {
    originals: BTreeMap<ObjectId, Option<MaterialRef>>,
}

impl HoverSnapshot {
    /// Records the current material of every object in `graph`
    ///
    /// Objects currently wearing an outline are left out.
    pub fn capture(graph: &Graph) -> Self {
        let originals = graph
            .objects()
            .iter()
            .filter(|object| !object.is_outlined())
            .map(|object| (object.id(), object.material().cloned()))
            .collect();
        Self { originals }
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.originals.contains_key(&id)
    }

    /// The material recorded for `id`; `None` when the object has no entry
    pub fn original(&self, id: ObjectId) -> Option<Option<&MaterialRef>> {
        self.originals.get(&id).map(Option::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.originals.keys().copied()
    }

    /// Puts every recorded object back on its original material
    ///
    /// Objects no longer in the graph are skipped. Returns how many objects
    /// actually changed.
    pub fn restore(&self, graph: &mut Graph) -> usize {
        let mut changed = 0;
        for (id, original) in &self.originals {
            let Some(object) = graph.object_mut(*id) else {
                continue;
            };
            let same = match (object.material(), original) {
                (Some(current), Some(original)) => Arc::ptr_eq(current, original),
                (None, None) => true,
                _ => false,
            };
            if !same {
                object.set_material(original.clone());
                changed += 1;
            }
        }
        changed
    }
}

/// Result of one pointer move
#[derive(Debug, Clone, PartialEq)]
pub struct HoverOutcome {
    pub status: HoverStatus,
    /// Object given the outline, if any
    pub outlined: Option<ObjectId>,
    /// Objects put back on their original material
    pub restored: usize,
}

/// Pointer-move state machine applying a single outline
pub struct HoverHighlightEngine<P: PickQuery = ObjectPicker> {
    picker: P,
    style: OutlineMaterial,
    snapshot: Option<HoverSnapshot>,
    registered: bool,
}

impl HoverHighlightEngine<ObjectPicker> {
    pub fn new() -> Self {
        Self::with_picker(ObjectPicker::new())
    }
}

impl Default for HoverHighlightEngine<ObjectPicker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PickQuery> HoverHighlightEngine<P> {
    pub fn with_picker(picker: P) -> Self {
        Self {
            picker,
            style: OutlineMaterial::default(),
            snapshot: None,
            registered: true,
        }
    }

    /// Builder pattern: Set the outline colour and alpha
    pub fn with_style(mut self, style: OutlineMaterial) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &OutlineMaterial {
        &self.style
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    /// Captures the snapshot on the first call; later calls are ignored
    ///
    /// Returns true if this call captured it.
    pub fn capture_snapshot(&mut self, graph: &Graph) -> bool {
        self.install_snapshot(HoverSnapshot::capture(graph))
    }

    /// Takes a snapshot captured elsewhere, e.g. by the scene host when the
    /// scene became ready; ignored once a snapshot is held
    pub fn install_snapshot(&mut self, snapshot: HoverSnapshot) -> bool {
        if self.snapshot.is_some() {
            log::debug!("Hover snapshot already captured, ignoring");
            return false;
        }
        log::debug!("Hover snapshot installed with {} objects", snapshot.len());
        self.snapshot = Some(snapshot);
        true
    }

    pub fn snapshot(&self) -> Option<&HoverSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Stops handling pointer moves. Must happen before the graph is torn down.
    pub fn deregister(&mut self) {
        if self.registered {
            log::debug!("Hover highlighting deregistered");
        }
        self.registered = false;
    }

    /// Handles one pointer move at drawing-buffer position (`x`, `y`)
    ///
    /// Returns `None` once deregistered; nothing is touched then.
    pub fn pointer_moved(
        &mut self,
        graph: &mut Graph,
        x: f32,
        y: f32,
        viewport: SurfaceSize,
        sink: &mut dyn StatusSink,
    ) -> Option<HoverOutcome> {
        if !self.registered {
            return None;
        }

        graph.set_pointer(x, y);
        let picked = self.picker.pick(graph, x, y, viewport).map(|result| result.object);

        let restored = self
            .snapshot
            .as_ref()
            .map_or(0, |snapshot| snapshot.restore(graph));

        let hovered = picked
            .and_then(|id| graph.object(id))
            .filter(|object| object.pickable)
            .map(|object| (object.id(), object.name.clone()));

        let (status, outlined) = match hovered {
            Some((id, name)) => {
                let outlined = if self.snapshot.as_ref().is_some_and(|snapshot| snapshot.contains(id)) {
                    graph.set_material(id, Some(self.style.into_ref()));
                    Some(id)
                } else {
                    log::debug!("'{}' is not in the hover snapshot, leaving it unoutlined", name);
                    None
                };
                (HoverStatus::Hovering(name), outlined)
            }
            None => (HoverStatus::NotHovering, None),
        };

        sink.publish(&status);

        Some(HoverOutcome {
            status,
            outlined,
            restored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_sphere,
        picking::PickResult,
        scene::{Mesh, StandardMaterial},
    };
    use cgmath::Vector3;

    /// Picks whatever object it is told to
    struct ScriptedPicker {
        next: Option<ObjectId>,
    }

    impl PickQuery for ScriptedPicker {
        fn pick(&mut self, _graph: &Graph, _x: f32, _y: f32, _viewport: SurfaceSize) -> Option<PickResult> {
            self.next.map(|object| PickResult {
                object,
                distance: 1.0,
                intersection_point: Vector3::new(0.0, 0.0, 0.0),
            })
        }
    }

    const VIEWPORT: SurfaceSize = SurfaceSize {
        width: 640,
        height: 480,
    };

    fn scene() -> (Graph, ObjectId, ObjectId, MaterialRef) {
        let mut graph = Graph::default();
        let mesh = Arc::new(Mesh::from_geometry(&generate_sphere(2.0, 16, 16)));
        let red = StandardMaterial::new("red").with_diffuse(1.0, 0.0, 0.0).into_ref();

        let a = graph.add_object("a", mesh.clone());
        let b = graph.add_object("b", mesh);
        graph.set_material(a, Some(red.clone()));
        (graph, a, b, red)
    }

    fn engine(next: Option<ObjectId>) -> HoverHighlightEngine<ScriptedPicker> {
        HoverHighlightEngine::with_picker(ScriptedPicker { next })
    }

    fn outlines(graph: &Graph) -> usize {
        graph.objects().iter().filter(|object| object.is_outlined()).count()
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(HoverStatus::Hovering("sphere1".into()).to_string(), "hovering over sphere1");
        assert_eq!(HoverStatus::NotHovering.to_string(), "not hovering over any");
    }

    #[test]
    fn test_moving_between_objects_keeps_one_outline() {
        let (mut graph, a, b, red) = scene();
        let mut engine = engine(Some(a));
        engine.capture_snapshot(&graph);
        let mut statuses = Vec::new();

        let outcome = engine
            .pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |s: &HoverStatus| statuses.push(s.to_string()))
            .unwrap();
        assert_eq!(outcome.outlined, Some(a));
        assert!(graph.object(a).is_some_and(|o| o.is_outlined()));

        engine.picker_mut().next = Some(b);
        let outcome = engine
            .pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |s: &HoverStatus| statuses.push(s.to_string()))
            .unwrap();
        assert_eq!(outcome.outlined, Some(b));
        assert_eq!(outcome.restored, 1);
        assert_eq!(outlines(&graph), 1);
        assert!(graph
            .object(a)
            .and_then(|o| o.material())
            .is_some_and(|m| Arc::ptr_eq(m, &red)));

        engine.picker_mut().next = None;
        engine.pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |s: &HoverStatus| statuses.push(s.to_string()));
        assert_eq!(outlines(&graph), 0);
        assert!(graph.object(b).is_some_and(|o| o.material().is_none()));

        assert_eq!(statuses, vec!["hovering over a", "hovering over b", "not hovering over any"]);
    }

    #[test]
    fn test_non_pickable_hit_is_ignored() {
        let (mut graph, a, _, _) = scene();
        if let Some(object) = graph.object_mut(a) {
            object.pickable = false;
        }
        let mut engine = engine(Some(a));
        engine.capture_snapshot(&graph);

        let outcome = engine
            .pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |_: &HoverStatus| {})
            .unwrap();
        assert_eq!(outcome.status, HoverStatus::NotHovering);
        assert_eq!(outlines(&graph), 0);
    }

    #[test]
    fn test_snapshot_is_captured_once() {
        let (mut graph, a, _, red) = scene();
        let mut engine = engine(None);
        assert!(engine.capture_snapshot(&graph));

        let blue = StandardMaterial::new("blue").with_diffuse(0.0, 0.0, 1.0).into_ref();
        graph.set_material(a, Some(blue));
        assert!(!engine.capture_snapshot(&graph));

        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.original(a).flatten().is_some_and(|m| Arc::ptr_eq(m, &red)));
    }

    #[test]
    fn test_objects_added_later_are_reported_not_outlined() {
        let (mut graph, _, _, _) = scene();
        let mut engine = engine(None);
        engine.capture_snapshot(&graph);

        let late = graph.add_object("late", Arc::new(Mesh::from_geometry(&generate_sphere(1.0, 8, 8))));
        engine.picker_mut().next = Some(late);

        let outcome = engine
            .pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |_: &HoverStatus| {})
            .unwrap();
        assert_eq!(outcome.status.hovered_name(), Some("late"));
        assert_eq!(outcome.outlined, None);
        assert_eq!(outlines(&graph), 0);
    }

    #[test]
    fn test_duplicate_names_restore_independently() {
        let mut graph = Graph::default();
        let mesh = Arc::new(Mesh::from_geometry(&generate_sphere(1.0, 8, 8)));
        let red = StandardMaterial::new("red").into_ref();
        let green = StandardMaterial::new("green").into_ref();
        let first = graph.add_object("twin", mesh.clone());
        let second = graph.add_object("twin", mesh);
        graph.set_material(first, Some(red.clone()));
        graph.set_material(second, Some(green.clone()));

        let mut engine = engine(Some(second));
        engine.capture_snapshot(&graph);
        engine.pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |_: &HoverStatus| {});
        engine.picker_mut().next = None;
        engine.pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |_: &HoverStatus| {});

        assert!(graph.object(first).and_then(|o| o.material()).is_some_and(|m| Arc::ptr_eq(m, &red)));
        assert!(graph.object(second).and_then(|o| o.material()).is_some_and(|m| Arc::ptr_eq(m, &green)));
    }

    #[test]
    fn test_deregistered_engine_does_nothing() {
        let (mut graph, a, _, _) = scene();
        let mut engine = engine(Some(a));
        engine.capture_snapshot(&graph);
        engine.deregister();

        let mut published = 0;
        let outcome = engine.pointer_moved(&mut graph, 0.0, 0.0, VIEWPORT, &mut |_: &HoverStatus| published += 1);
        assert!(outcome.is_none());
        assert_eq!(published, 0);
        assert_eq!(outlines(&graph), 0);
    }
}
