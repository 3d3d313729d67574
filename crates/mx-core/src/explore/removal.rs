//! Removing elements by name

use indexmap::IndexSet;
use mx_cad::Visit;

use crate::model::Model;
use crate::scene::{Assembly, ElementId};
use crate::traverse::{EditQueue, ElementVisitor, VisitContext};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    pub roots: usize,
    pub instances: usize,
}

/// True if `child` is an instance of an element named `name`
///
/// The instance's own name is not considered.
fn targets_named(model: &Model, child: ElementId, name: &str) -> bool {
    model
        .instance(child)
        .and_then(|instance| model.element(instance.target()))
        .is_ok_and(|target| target.name() == Some(name))
}

struct RemovalFinder<'n> {
    name: &'n str,
    found: IndexSet<(ElementId, ElementId)>,
}

impl ElementVisitor for RemovalFinder<'_> {
    fn visit_enter_assembly(&mut self, ctx: &VisitContext<'_>, assembly: &Assembly) -> Visit {
        for &child in assembly.instances() {
            if targets_named(ctx.model, child, self.name) {
                self.found.insert((ctx.id, child));
            }
        }
        Visit::Continue
    }
}

/// Remove every root named `name` and every assembly child instancing an
/// element named `name`
///
/// Roots are removed up front; assembly children are collected during a walk
/// and removed once it is over, each (assembly, instance) pair once however
/// many times the assembly is instanced.
pub fn remove_elements_named(model: &mut Model, name: &str) -> RemovalSummary {
    let roots: Vec<ElementId> = {
        let model = &*model;
        model
            .roots()
            .iter()
            .copied()
            .filter(|&root| model.element(root).is_ok_and(|node| node.name() == Some(name)))
            .collect()
    };
    let mut summary = RemovalSummary::default();
    for root in roots {
        summary.roots += model.remove_root(root);
    }

    let mut finder = RemovalFinder {
        name,
        found: IndexSet::new(),
    };
    model.accept(&mut finder);
    let mut edits = EditQueue::new();
    for (assembly, instance) in finder.found {
        edits.remove_instance(assembly, instance);
    }
    summary.instances = edits.apply(model);
    tracing::info!(
        "Removed '{}': {} roots, {} instances",
        name,
        summary.roots,
        summary.instances
    );
    summary
}
