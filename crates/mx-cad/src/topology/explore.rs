//! Walking shape trees

use std::ops::ControlFlow;

use indexmap::IndexSet;

use super::{ShapeId, ShapeRef, ShapeStore, ShapeType};
use crate::visit::{Visit, WalkOutcome};

/// Position of the current shape in the walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeContext {
    /// 0 for the walk root
    pub depth: usize,
    /// Nearest enclosing face, used to look up PCurves of edges
    pub face: Option<ShapeId>,
}

/// Enter/leave visitor over a shape tree
pub trait ShapeVisitor {
    fn enter(&mut self, _store: &ShapeStore, _shape: ShapeRef, _ctx: &ShapeContext) -> Visit {
        Visit::Continue
    }

    fn leave(&mut self, _store: &ShapeStore, _shape: ShapeRef, _ctx: &ShapeContext) {}
}

/// Depth-first walk from `root`; `leave` runs for every entered shape unless aborted
pub fn walk<V: ShapeVisitor + ?Sized>(
    store: &ShapeStore,
    root: ShapeRef,
    visitor: &mut V,
) -> WalkOutcome {
    match walk_shape(store, root, ShapeContext::default(), visitor) {
        ControlFlow::Continue(()) => WalkOutcome::Completed,
        ControlFlow::Break(()) => WalkOutcome::Aborted,
    }
}

fn walk_shape<V: ShapeVisitor + ?Sized>(
    store: &ShapeStore,
    shape: ShapeRef,
    ctx: ShapeContext,
    visitor: &mut V,
) -> ControlFlow<()> {
    let kind = store.shape_type(shape.id);
    if kind == ShapeType::Undefined {
        tracing::warn!("Shape {} is not in the store", shape.id);
    }

    match visitor.enter(store, shape, &ctx) {
        Visit::Abort => return ControlFlow::Break(()),
        Visit::SkipChildren => {}
        Visit::Continue => {
            let child_ctx = ShapeContext {
                depth: ctx.depth + 1,
                face: if kind == ShapeType::Face {
                    Some(shape.id)
                } else {
                    ctx.face
                },
            };
            for child in store.children(shape) {
                walk_shape(store, child, child_ctx, visitor)?;
            }
        }
    }

    visitor.leave(store, shape, &ctx);
    ControlFlow::Continue(())
}

/// Flat visitor that only sees faces, edges and vertices
///
/// Intermediate levels are still walked so every terminal shape is reached.
pub trait SubshapeVisitor {
    fn visit_face(&mut self, _store: &ShapeStore, _face: ShapeRef, _ctx: &ShapeContext) {}

    fn visit_edge(&mut self, _store: &ShapeStore, _edge: ShapeRef, _ctx: &ShapeContext) {}

    fn visit_vertex(&mut self, _store: &ShapeStore, _vertex: ShapeRef, _ctx: &ShapeContext) {}
}

struct Flat<'v, V: ?Sized>(&'v mut V);

impl<V: SubshapeVisitor + ?Sized> ShapeVisitor for Flat<'_, V> {
    fn enter(&mut self, store: &ShapeStore, shape: ShapeRef, ctx: &ShapeContext) -> Visit {
        match store.shape_type(shape.id) {
            ShapeType::Face => self.0.visit_face(store, shape, ctx),
            ShapeType::Edge => self.0.visit_edge(store, shape, ctx),
            ShapeType::Vertex => self.0.visit_vertex(store, shape, ctx),
            _ => {}
        }
        Visit::Continue
    }
}

pub fn visit_subshapes<V: SubshapeVisitor + ?Sized>(
    store: &ShapeStore,
    root: ShapeRef,
    visitor: &mut V,
) {
    walk(store, root, &mut Flat(visitor));
}

/// Iterator over every occurrence of one shape kind below a root
///
/// Shared shapes are yielded once per occurrence.
pub struct ShapeIter<'s> {
    store: &'s ShapeStore,
    kind: ShapeType,
    stack: Vec<ShapeRef>,
}

impl<'s> ShapeIter<'s> {
    pub fn new(store: &'s ShapeStore, root: ShapeRef, kind: ShapeType) -> Self {
        Self {
            store,
            kind,
            stack: vec![root],
        }
    }
}

impl Iterator for ShapeIter<'_> {
    type Item = ShapeRef;

    fn next(&mut self) -> Option<ShapeRef> {
        while let Some(shape) = self.stack.pop() {
            if self.store.shape_type(shape.id) == self.kind {
                return Some(shape);
            }
            let children = self.store.children(shape);
            self.stack.extend(children.into_iter().rev());
        }
        None
    }
}

/// Distinct shapes of `kind` below `root`, in first-seen order
pub fn unique_subshapes(store: &ShapeStore, root: ShapeRef, kind: ShapeType) -> IndexSet<ShapeId> {
    ShapeIter::new(store, root, kind).map(|s| s.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Axis3Placement, Surface};
    use crate::topology::{BodyType, Orientation};
    use glam::DVec3;
    use std::sync::Arc;

    fn plane() -> Arc<Surface> {
        Arc::new(Surface::plane(Axis3Placement::default()))
    }

    /// Two triangular faces sharing the edge (0,0)-(1,0)
    fn shared_edge_body(store: &mut ShapeStore) -> (ShapeId, ShapeId) {
        let shared = store.add_segment(DVec3::ZERO, DVec3::X).unwrap();
        let mut faces = Vec::new();
        for apex in [DVec3::Y, -DVec3::Y] {
            let a = store.add_segment(DVec3::X, apex).unwrap();
            let b = store.add_segment(apex, DVec3::ZERO).unwrap();
            let wire = store
                .add_wire([shared, a, b].map(ShapeRef::forward))
                .unwrap();
            let face = store.add_face(plane());
            store.append(face, ShapeRef::forward(wire)).unwrap();
            faces.push(ShapeRef::forward(face));
        }
        let shell = store.add_shell(faces).unwrap();
        let body = store
            .add_body(BodyType::Sheet, [ShapeRef::forward(shell)])
            .unwrap();
        (body, shared)
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<(String, usize)>,
        skip_faces: bool,
    }

    impl ShapeVisitor for Recorder {
        fn enter(&mut self, store: &ShapeStore, shape: ShapeRef, ctx: &ShapeContext) -> Visit {
            let kind = store.shape_type(shape.id);
            self.events.push((format!("enter {}", kind.name()), ctx.depth));
            if self.skip_faces && kind == ShapeType::Face {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        }

        fn leave(&mut self, store: &ShapeStore, shape: ShapeRef, ctx: &ShapeContext) {
            let kind = store.shape_type(shape.id);
            self.events.push((format!("leave {}", kind.name()), ctx.depth));
        }
    }

    #[test]
    fn test_shared_edge_counted_once() {
        let mut store = ShapeStore::new();
        let (body, shared) = shared_edge_body(&mut store);

        let occurrences = ShapeIter::new(&store, ShapeRef::forward(body), ShapeType::Edge).count();
        assert_eq!(occurrences, 6);

        let unique = unique_subshapes(&store, ShapeRef::forward(body), ShapeType::Edge);
        assert_eq!(unique.len(), 5);
        assert_eq!(
            unique.iter().filter(|&&id| id == shared).count(),
            1
        );
    }

    #[test]
    fn test_enter_leave_pairs_and_depth() {
        let mut store = ShapeStore::new();
        let (body, _) = shared_edge_body(&mut store);
        let mut recorder = Recorder::default();

        assert!(walk(&store, ShapeRef::forward(body), &mut recorder).is_completed());
        assert_eq!(recorder.events.first(), Some(&("enter Body".to_string(), 0)));
        assert_eq!(recorder.events.last(), Some(&("leave Body".to_string(), 0)));
        let enters = recorder.events.iter().filter(|(e, _)| e.starts_with("enter")).count();
        assert_eq!(enters * 2, recorder.events.len());
    }

    #[test]
    fn test_skip_children_still_leaves() {
        let mut store = ShapeStore::new();
        let (body, _) = shared_edge_body(&mut store);
        let mut recorder = Recorder {
            skip_faces: true,
            ..Default::default()
        };
        walk(&store, ShapeRef::forward(body), &mut recorder);

        assert!(!recorder.events.iter().any(|(e, _)| e.contains("Wire")));
        let faces_left = recorder.events.iter().filter(|(e, _)| e == "leave Face").count();
        assert_eq!(faces_left, 2);
    }

    #[test]
    fn test_flat_visitor_tracks_current_face() {
        struct EdgesPerFace(Vec<Option<ShapeId>>);
        impl SubshapeVisitor for EdgesPerFace {
            fn visit_edge(&mut self, _: &ShapeStore, _: ShapeRef, ctx: &ShapeContext) {
                self.0.push(ctx.face);
            }
        }

        let mut store = ShapeStore::new();
        let (body, _) = shared_edge_body(&mut store);
        let mut visitor = EdgesPerFace(Vec::new());
        visit_subshapes(&store, ShapeRef::forward(body), &mut visitor);

        assert_eq!(visitor.0.len(), 6);
        assert!(visitor.0.iter().all(Option::is_some));
    }

    #[test]
    fn test_explored_wire_orientations() {
        let mut store = ShapeStore::new();
        let outer_edge = store.add_segment(DVec3::ZERO, DVec3::X).unwrap();
        let inner_edge = store.add_segment(DVec3::ZERO, DVec3::Y).unwrap();
        let outer = store.add_wire([ShapeRef::forward(outer_edge)]).unwrap();
        let inner = store.add_wire([ShapeRef::forward(inner_edge)]).unwrap();
        let face = store.add_face(plane());
        store
            .append(face, ShapeRef::new(inner, Orientation::Reversed))
            .unwrap();
        store.append(face, ShapeRef::forward(outer)).unwrap();

        let wires: Vec<_> = ShapeIter::new(&store, ShapeRef::forward(face), ShapeType::Wire)
            .map(|w| (w.id, w.orientation))
            .collect();
        assert_eq!(
            wires,
            vec![(outer, Orientation::Forward), (inner, Orientation::Reversed)]
        );
    }

    #[test]
    fn test_abort_stops_walk() {
        struct StopAtFirstEdge(usize);
        impl ShapeVisitor for StopAtFirstEdge {
            fn enter(&mut self, store: &ShapeStore, shape: ShapeRef, _: &ShapeContext) -> Visit {
                self.0 += 1;
                if store.shape_type(shape.id) == ShapeType::Edge {
                    Visit::Abort
                } else {
                    Visit::Continue
                }
            }
        }

        let mut store = ShapeStore::new();
        let (body, _) = shared_edge_body(&mut store);
        let mut visitor = StopAtFirstEdge(0);
        assert_eq!(walk(&store, ShapeRef::forward(body), &mut visitor), WalkOutcome::Aborted);
        assert_eq!(visitor.0, 5);
    }
}
