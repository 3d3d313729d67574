//! Scene-graph traversal
//!
//! [`Model::accept`] walks every root in order, depth first. Assemblies and
//! instances get an enter/leave pair; parts get a single `visit_part` call and
//! cannot be pruned. Returning [`Visit::SkipChildren`] from an enter callback
//! prunes the subtree but the leave callback still runs; [`Visit::Abort`]
//! stops the walk with no further callbacks.
//!
//! Each walk owns its [`TransformStack`], so concurrent read-only walks over
//! the same model are independent. Structural edits are recorded in an
//! [`EditQueue`] during the walk and applied afterwards.

mod edit;

use std::ops::ControlFlow;

use mx_cad::{Transformation, Visit, WalkOutcome};

pub use edit::{Edit, EditQueue};

use crate::model::Model;
use crate::scene::{Assembly, ElementId, ElementKind, ElementType, Instance, Part, SceneNode};

/// Where the walker currently is
#[derive(Debug, Clone, Copy)]
pub struct VisitContext<'m> {
    pub model: &'m Model,
    pub id: ElementId,
    pub node: &'m SceneNode,
    /// Assembly holding this instance, or instance referencing this target
    pub parent: Option<ElementId>,
    /// 0 for roots
    pub depth: usize,
    /// Absolute transformation; for an instance it includes its own local one
    pub transform: Transformation,
}

impl VisitContext<'_> {
    pub fn name(&self) -> &str {
        self.node.display_name()
    }

    pub fn element_type(&self) -> ElementType {
        self.node.element_type()
    }
}

/// Scene-graph visitor
///
/// Every method has a default. The enter/leave hooks for assemblies and
/// instances fall back to [`visit_enter_element`](Self::visit_enter_element)
/// and [`visit_leave_element`](Self::visit_leave_element), so a visitor can
/// treat both uniformly. A visitor that only overrides `visit_part` descends
/// everywhere.
pub trait ElementVisitor {
    fn visit_part(&mut self, _ctx: &VisitContext<'_>, _part: &Part) {}

    fn visit_enter_element(&mut self, _ctx: &VisitContext<'_>) -> Visit {
        Visit::Continue
    }

    fn visit_leave_element(&mut self, _ctx: &VisitContext<'_>) {}

    fn visit_enter_assembly(&mut self, ctx: &VisitContext<'_>, _assembly: &Assembly) -> Visit {
        self.visit_enter_element(ctx)
    }

    fn visit_leave_assembly(&mut self, ctx: &VisitContext<'_>, _assembly: &Assembly) {
        self.visit_leave_element(ctx)
    }

    fn visit_enter_instance(&mut self, ctx: &VisitContext<'_>, _instance: &Instance) -> Visit {
        self.visit_enter_element(ctx)
    }

    fn visit_leave_instance(&mut self, ctx: &VisitContext<'_>, _instance: &Instance) {
        self.visit_leave_element(ctx)
    }
}

/// Stack of absolute transformations, seeded with identity
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Transformation>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            stack: vec![Transformation::identity()],
        }
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Transformation {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Push `top() ∘ local` and return it
    pub fn push_local(&mut self, local: &Transformation) -> Transformation {
        let absolute = self.top().multiplied(local);
        self.stack.push(absolute);
        absolute
    }

    /// Pop the last pushed transformation; the identity seed is never popped
    pub fn pop(&mut self) -> Option<Transformation> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Number of pushed transformations above the seed
    pub fn len(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Walker<'m> {
    model: &'m Model,
    transforms: TransformStack,
}

impl<'m> Walker<'m> {
    fn new(model: &'m Model) -> Self {
        Self {
            model,
            transforms: TransformStack::new(),
        }
    }

    fn element<V: ElementVisitor + ?Sized>(
        &mut self,
        id: ElementId,
        parent: Option<ElementId>,
        depth: usize,
        visitor: &mut V,
    ) -> ControlFlow<()> {
        let model = self.model;
        let Ok(node) = model.element(id) else {
            tracing::warn!("Element {} is not in the model, skipping", id);
            return ControlFlow::Continue(());
        };
        let mut ctx = VisitContext {
            model,
            id,
            node,
            parent,
            depth,
            transform: self.transforms.top(),
        };

        match &node.kind {
            ElementKind::Part(part) => visitor.visit_part(&ctx, part),
            ElementKind::Assembly(assembly) => {
                match visitor.visit_enter_assembly(&ctx, assembly) {
                    Visit::Abort => return ControlFlow::Break(()),
                    Visit::SkipChildren => {}
                    Visit::Continue => {
                        for &child in assembly.instances() {
                            self.element(child, Some(id), depth + 1, visitor)?;
                        }
                    }
                }
                visitor.visit_leave_assembly(&ctx, assembly);
            }
            ElementKind::Instance(instance) => {
                ctx.transform = self.transforms.push_local(&instance.local());
                let flow = match visitor.visit_enter_instance(&ctx, instance) {
                    Visit::Abort => ControlFlow::Break(()),
                    Visit::SkipChildren => ControlFlow::Continue(()),
                    Visit::Continue => self.element(instance.target(), Some(id), depth + 1, visitor),
                };
                if flow.is_continue() {
                    visitor.visit_leave_instance(&ctx, instance);
                }
                self.transforms.pop();
                return flow;
            }
        }
        ControlFlow::Continue(())
    }
}

impl Model {
    /// Walk every root in order
    pub fn accept<V: ElementVisitor + ?Sized>(&self, visitor: &mut V) -> WalkOutcome {
        let mut walker = Walker::new(self);
        for &root in self.roots() {
            if walker.element(root, None, 0, visitor).is_break() {
                return WalkOutcome::Aborted;
            }
        }
        WalkOutcome::Completed
    }

    /// Walk the subtree of a single element, as if it were a root
    pub fn accept_from<V: ElementVisitor + ?Sized>(
        &self,
        element: ElementId,
        visitor: &mut V,
    ) -> WalkOutcome {
        match Walker::new(self).element(element, None, 0, visitor) {
            ControlFlow::Continue(()) => WalkOutcome::Completed,
            ControlFlow::Break(()) => WalkOutcome::Aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Part;
    use glam::DVec3;
    use std::f64::consts::FRAC_PI_2;

    /// Records every callback as text
    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
        prune: Option<&'static str>,
        abort_at: Option<&'static str>,
    }

    impl Trace {
        fn decide(&self, name: &str) -> Visit {
            if self.abort_at == Some(name) {
                Visit::Abort
            } else if self.prune == Some(name) {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        }
    }

    impl ElementVisitor for Trace {
        fn visit_part(&mut self, ctx: &VisitContext<'_>, _: &Part) {
            self.events.push(format!("part {}", ctx.name()));
        }
        fn visit_enter_assembly(&mut self, ctx: &VisitContext<'_>, _: &Assembly) -> Visit {
            self.events.push(format!("enter asm {}", ctx.name()));
            self.decide(ctx.name())
        }
        fn visit_leave_assembly(&mut self, ctx: &VisitContext<'_>, _: &Assembly) {
            self.events.push(format!("leave asm {}", ctx.name()));
        }
        fn visit_enter_instance(&mut self, ctx: &VisitContext<'_>, _: &Instance) -> Visit {
            self.events.push(format!("enter inst {}", ctx.name()));
            self.decide(ctx.name())
        }
        fn visit_leave_instance(&mut self, ctx: &VisitContext<'_>, _: &Instance) {
            self.events.push(format!("leave inst {}", ctx.name()));
        }
    }

    /// root asm "top" -> inst "i1" -> asm "sub" -> inst "i2" -> part "p"
    ///                -> inst "i3" -> part "p"
    fn nested_model() -> Model {
        let mut model = Model::new("nested");
        let part = model.add_part(Some("p"), Part::new());
        let sub = model.add_assembly(Some("sub"));
        model.assembly_add_instance(sub, part, None, Some("i2")).unwrap();
        let top = model.add_assembly(Some("top"));
        model.assembly_add_instance(top, sub, None, Some("i1")).unwrap();
        model.assembly_add_instance(top, part, None, Some("i3")).unwrap();
        model.add_root(top).unwrap();
        model
    }

    #[test]
    fn test_walk_order() {
        let model = nested_model();
        let mut trace = Trace::default();
        assert!(model.accept(&mut trace).is_completed());
        assert_eq!(
            trace.events,
            vec![
                "enter asm top",
                "enter inst i1",
                "enter asm sub",
                "enter inst i2",
                "part p",
                "leave inst i2",
                "leave asm sub",
                "leave inst i1",
                "enter inst i3",
                "part p",
                "leave inst i3",
                "leave asm top",
            ]
        );
    }

    #[test]
    fn test_pruned_assembly_hides_descendants() {
        let model = nested_model();
        let mut trace = Trace {
            prune: Some("sub"),
            ..Default::default()
        };
        model.accept(&mut trace);

        let events = trace.events.join("|");
        assert!(!events.contains("i2"));
        assert_eq!(trace.events.iter().filter(|e| *e == "leave asm sub").count(), 1);
        assert_eq!(trace.events.iter().filter(|e| *e == "part p").count(), 1);
    }

    #[test]
    fn test_abort_stops_everything() {
        let model = nested_model();
        let mut trace = Trace {
            abort_at: Some("i2"),
            ..Default::default()
        };
        assert_eq!(model.accept(&mut trace), WalkOutcome::Aborted);
        assert_eq!(trace.events.last().map(String::as_str), Some("enter inst i2"));
        assert_eq!(trace.events.len(), 4);
    }

    #[test]
    fn test_part_only_visitor_descends_everywhere() {
        struct Parts(usize);
        impl ElementVisitor for Parts {
            fn visit_part(&mut self, _: &VisitContext<'_>, _: &Part) {
                self.0 += 1;
            }
        }

        let model = nested_model();
        let mut parts = Parts(0);
        model.accept(&mut parts);
        assert_eq!(parts.0, 2);
    }

    #[test]
    fn test_combined_element_hooks() {
        #[derive(Default)]
        struct Depths(Vec<(ElementType, usize)>);
        impl ElementVisitor for Depths {
            fn visit_enter_element(&mut self, ctx: &VisitContext<'_>) -> Visit {
                self.0.push((ctx.element_type(), ctx.depth));
                Visit::Continue
            }
        }

        let model = nested_model();
        let mut depths = Depths::default();
        model.accept(&mut depths);
        assert_eq!(
            depths.0,
            vec![
                (ElementType::Assembly, 0),
                (ElementType::Instance, 1),
                (ElementType::Assembly, 2),
                (ElementType::Instance, 3),
                (ElementType::Instance, 1),
            ]
        );
    }

    #[derive(Default)]
    struct PartTransforms(Vec<Transformation>);

    impl ElementVisitor for PartTransforms {
        fn visit_part(&mut self, ctx: &VisitContext<'_>, _: &Part) {
            self.0.push(ctx.transform);
        }
    }

    fn three_level(a: Transformation, b: Transformation, c: Transformation) -> Model {
        let mut model = Model::new("chain");
        let part = model.add_part(Some("leaf"), Part::new());
        let inner = model.add_assembly(Some("inner"));
        model.assembly_add_instance(inner, part, Some(c), None).unwrap();
        let middle = model.add_assembly(Some("middle"));
        model.assembly_add_instance(middle, inner, Some(b), None).unwrap();
        let root = model.add_instance(middle, Some(a), None).unwrap();
        model.add_root(root).unwrap();
        model
    }

    #[test]
    fn test_transform_composition_root_to_leaf() {
        let a = Transformation::from_translation(DVec3::new(10.0, 0.0, 0.0));
        let b = Transformation::from_rotation(DVec3::Z, FRAC_PI_2).unwrap();
        let c = Transformation::from_translation(DVec3::new(0.0, 0.0, 5.0))
            .multiplied(&Transformation::from_rotation(DVec3::X, 0.25).unwrap());

        let mut visitor = PartTransforms::default();
        three_level(a, b, c).accept(&mut visitor);
        let expected = Transformation::from(a.as_affine() * b.as_affine() * c.as_affine());
        assert_eq!(visitor.0.len(), 1);
        assert!(visitor.0[0].abs_diff_eq(&expected, 1e-12));
        assert!(a.multiplied(&b).multiplied(&c).abs_diff_eq(&a.multiplied(&b.multiplied(&c)), 1e-12));

        let mut swapped = PartTransforms::default();
        three_level(a, c, b).accept(&mut swapped);
        assert!(!swapped.0[0].abs_diff_eq(&expected, 1e-6));
    }

    #[test]
    fn test_stack_is_balanced_after_walk() {
        let mut stack = TransformStack::new();
        assert!(stack.is_empty());
        stack.push_local(&Transformation::from_translation(DVec3::X));
        assert_eq!(stack.len(), 1);
        assert!(stack.pop().is_some());
        assert!(stack.pop().is_none());
        assert!(stack.top().is_identity());
    }

    #[test]
    fn test_concurrent_walks_are_independent() {
        let a = Transformation::from_translation(DVec3::X);
        let b = Transformation::from_translation(DVec3::Y);
        let c = Transformation::from_translation(DVec3::Z);
        let model = three_level(a, b, c);

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut visitor = PartTransforms::default();
                        model.accept(&mut visitor);
                        visitor.0[0].translation_part()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|t| *t == DVec3::ONE));
    }

    #[test]
    fn test_accept_from_single_element() {
        let model = nested_model();
        let sub = model.find_by_name("sub").next().unwrap();
        let mut trace = Trace::default();
        model.accept_from(sub, &mut trace);
        assert_eq!(trace.events.first().map(String::as_str), Some("enter asm sub"));
        assert_eq!(trace.events.len(), 5);
    }
}
