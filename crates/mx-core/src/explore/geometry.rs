//! Curve, surface and PCurve dump of every B-Rep

use std::collections::HashSet;

use mx_cad::{ShapeContext, ShapeRef, ShapeStore, SubshapeVisitor, visit_subshapes};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::scene::{ElementId, Part};
use crate::traverse::{ElementVisitor, VisitContext};

/// Geometry lines of one part, indented by shape depth
#[derive(Debug, Clone, Default)]
pub struct PartGeometry {
    pub part: String,
    pub lines: Vec<String>,
}

struct GeometryDumper {
    lines: Vec<String>,
}

impl SubshapeVisitor for GeometryDumper {
    fn visit_face(&mut self, store: &ShapeStore, face: ShapeRef, ctx: &ShapeContext) {
        let indent = "  ".repeat(ctx.depth);
        let text = match store.face(face.id).and_then(|f| f.surface.as_ref()) {
            Some(surface) => surface.describe(),
            None => "no surface".into(),
        };
        self.lines.push(format!("{indent}Face {}: {text}", face.id));
    }

    fn visit_edge(&mut self, store: &ShapeStore, edge: ShapeRef, ctx: &ShapeContext) {
        let Some(data) = store.edge(edge.id) else {
            return;
        };
        let indent = "  ".repeat(ctx.depth);
        match &data.curve {
            Some(curve) => self.lines.push(format!(
                "{indent}Edge {}: {} range [{}, {}]",
                edge.id,
                curve.describe(),
                data.range.0,
                data.range.1
            )),
            None => self.lines.push(format!("{indent}Edge {}: degenerated", edge.id)),
        }
        if let Some(pcurve) = ctx.face.and_then(|face| data.pcurve(face)) {
            self.lines.push(format!(
                "{indent}  PCurve on {}: {} range [{}, {}]",
                pcurve.face,
                pcurve.curve.describe(),
                pcurve.range.0,
                pcurve.range.1
            ));
        }
    }
}

#[derive(Default)]
struct GeometryVisitor {
    parts: Vec<PartGeometry>,
    seen: HashSet<ElementId>,
    error: Option<ModelError>,
}

impl GeometryVisitor {
    fn dump(&mut self, name: &str, part: &Part) -> ModelResult<()> {
        let Some(brep) = part.brep() else {
            return Ok(());
        };
        let data = brep.data()?;
        let mut dumper = GeometryDumper { lines: Vec::new() };
        for body in data.body_refs() {
            visit_subshapes(data.store(), body, &mut dumper);
        }
        self.parts.push(PartGeometry {
            part: name.to_owned(),
            lines: dumper.lines,
        });
        Ok(())
    }
}

impl ElementVisitor for GeometryVisitor {
    fn visit_part(&mut self, ctx: &VisitContext<'_>, part: &Part) {
        if self.error.is_none()
            && self.seen.insert(ctx.id)
            && let Err(e) = self.dump(ctx.name(), part)
        {
            self.error = Some(e);
        }
    }
}

pub fn explore_geometry(model: &Model) -> ModelResult<Vec<PartGeometry>> {
    let mut visitor = GeometryVisitor::default();
    model.accept(&mut visitor);
    match visitor.error {
        Some(e) => Err(e),
        None => Ok(visitor.parts),
    }
}
