//! Absolute transformation of every instance occurrence

use std::fmt;

use mx_cad::{Transformation, Visit};

use crate::model::Model;
use crate::scene::{ElementId, Instance};
use crate::traverse::{ElementVisitor, VisitContext};

#[derive(Debug, Clone)]
pub struct InstanceTransform {
    pub instance: ElementId,
    pub name: String,
    pub depth: usize,
    /// Composition of every instance transformation from the root down to this one
    pub absolute: Transformation,
}

#[derive(Default)]
struct TransformCollector(Vec<InstanceTransform>);

impl ElementVisitor for TransformCollector {
    fn visit_enter_instance(&mut self, ctx: &VisitContext<'_>, _instance: &Instance) -> Visit {
        self.0.push(InstanceTransform {
            instance: ctx.id,
            name: ctx.name().to_owned(),
            depth: ctx.depth,
            absolute: ctx.transform,
        });
        Visit::Continue
    }
}

/// One entry per instance occurrence, in walk order
pub fn instance_transforms(model: &Model) -> Vec<InstanceTransform> {
    let mut collector = TransformCollector::default();
    model.accept(&mut collector);
    collector.0
}

impl fmt::Display for InstanceTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.depth);
        writeln!(f, "{indent}Instance {}:", self.name)?;
        for row in self.absolute.rotation_part() {
            writeln!(f, "{indent}  | {:>8.4} {:>8.4} {:>8.4} |", row[0], row[1], row[2])?;
        }
        let t = self.absolute.translation_part();
        writeln!(f, "{indent}  translation ({:.4}, {:.4}, {:.4})", t.x, t.y, t.z)
    }
}
