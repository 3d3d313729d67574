//! Shape-tree listing of every B-Rep body

use std::collections::HashSet;
use std::fmt;

use mx_cad::{ShapeContext, ShapeId, ShapeRef, ShapeStore, ShapeType, ShapeVisitor, Visit, walk};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::representation::RepresentationId;
use crate::scene::{ElementId, Part};
use crate::traverse::{ElementVisitor, VisitContext};

#[derive(Debug, Clone)]
pub struct BodyListing {
    pub part: String,
    pub body_type: &'static str,
    /// One line per shape occurrence below the body, indented by depth
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BRepReport {
    pub bodies: Vec<BodyListing>,
    /// Distinct shapes across all representations
    pub unique_shapes: usize,
}

struct Lister<'a> {
    lines: Vec<String>,
    unique: &'a mut HashSet<(RepresentationId, ShapeId)>,
    representation: RepresentationId,
}

impl ShapeVisitor for Lister<'_> {
    fn enter(&mut self, store: &ShapeStore, shape: ShapeRef, ctx: &ShapeContext) -> Visit {
        self.unique.insert((self.representation, shape.id));
        if ctx.depth > 0 {
            let indent = "  ".repeat(ctx.depth);
            self.lines.push(format!("{indent}{}", shape_info(store, shape)));
            if let Some(detail) = shape_detail(store, shape) {
                self.lines.push(format!("{indent}  {detail}"));
            }
        }
        Visit::Continue
    }
}

fn shape_info(store: &ShapeStore, shape: ShapeRef) -> String {
    let kind = store.shape_type(shape.id);
    let orientation = format!(". Orientation: {}", shape.orientation.name());
    match kind {
        ShapeType::Edge => match store.edge(shape.id) {
            Some(edge) => format!(
                "Edge{}{orientation}. Tolerance {}",
                if edge.degenerate { "(Degenerated)" } else { "" },
                edge.tolerance
            ),
            None => "Edge".into(),
        },
        ShapeType::Vertex => match store.vertex(shape.id) {
            Some(vertex) => format!(
                "Vertex{orientation}. Tolerance {}. Point ({}, {}, {})",
                vertex.tolerance, vertex.point.x, vertex.point.y, vertex.point.z
            ),
            None => "Vertex".into(),
        },
        ShapeType::Wire | ShapeType::Face => format!("{}{orientation}", kind.name()),
        _ => kind.name().to_owned(),
    }
}

fn shape_detail(store: &ShapeStore, shape: ShapeRef) -> Option<String> {
    match store.shape_type(shape.id) {
        ShapeType::Face => {
            let surface = store.face(shape.id)?.surface.as_ref();
            Some(format!(
                "Surface: {}",
                surface.map_or("Undefined", |s| s.surface_type().name())
            ))
        }
        ShapeType::Edge => {
            let curve = store.edge(shape.id)?.curve.as_ref()?;
            Some(format!("Curve: {}", curve.curve_type().name()))
        }
        _ => None,
    }
}

#[derive(Default)]
struct BRepVisitor {
    report: BRepReport,
    seen_parts: HashSet<ElementId>,
    unique: HashSet<(RepresentationId, ShapeId)>,
    error: Option<ModelError>,
}

impl BRepVisitor {
    fn explore(&mut self, name: &str, part: &Part) -> ModelResult<()> {
        let Some(brep) = part.brep() else {
            return Ok(());
        };
        let data = brep.data()?;
        for body in data.body_refs() {
            let body_type = data
                .store()
                .body(body.id)
                .map_or("Undefined", |b| b.body_type.name());
            let mut lister = Lister {
                lines: Vec::new(),
                unique: &mut self.unique,
                representation: brep.id(),
            };
            walk(data.store(), body, &mut lister);
            self.report.bodies.push(BodyListing {
                part: name.to_owned(),
                body_type,
                lines: lister.lines,
            });
        }
        Ok(())
    }
}

impl ElementVisitor for BRepVisitor {
    fn visit_part(&mut self, ctx: &VisitContext<'_>, part: &Part) {
        if self.error.is_some() || !self.seen_parts.insert(ctx.id) {
            return;
        }
        if let Err(e) = self.explore(ctx.name(), part) {
            self.error = Some(e);
        }
    }
}

/// List every body of every distinct part, materializing B-Reps as needed
pub fn explore_brep(model: &Model) -> ModelResult<BRepReport> {
    let mut visitor = BRepVisitor::default();
    model.accept(&mut visitor);
    if let Some(e) = visitor.error {
        return Err(e);
    }
    let mut report = visitor.report;
    report.unique_shapes = visitor.unique.len();
    Ok(report)
}

impl fmt::Display for BRepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, body) in self.bodies.iter().enumerate() {
            writeln!(f, "Body {i} of {}: -type {}", body.part, body.body_type)?;
            for line in &body.lines {
                writeln!(f, "{line}")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Total unique shapes count: {}", self.unique_shapes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::nut_bolt;

    #[test]
    fn test_each_part_listed_once() {
        let fixture = nut_bolt();
        let report = explore_brep(&fixture.model).unwrap();
        assert_eq!(report.bodies.len(), 2);
        assert_eq!(report.bodies[0].part, "bolt");
        assert_eq!(report.bodies[0].body_type, "Solid");
        // body + solid + shell + 6 faces + 6 wires + 12 edges + 8 vertices, per cube
        assert_eq!(report.unique_shapes, 2 * 35);
    }

    #[test]
    fn test_listing_contents() {
        let fixture = nut_bolt();
        let report = explore_brep(&fixture.model).unwrap();
        let lines = &report.bodies[0].lines;
        assert_eq!(lines[0], "  Solid");
        assert_eq!(lines[1], "    Shell");
        assert_eq!(lines[2], "      Face. Orientation: Forward");
        assert_eq!(lines[3], "        Surface: Plane");
        // every face lists 4 edge uses, each followed by its curve
        assert_eq!(lines.iter().filter(|l| l.trim_start().starts_with("Edge")).count(), 24);
        assert_eq!(lines.iter().filter(|l| l.trim() == "Curve: Line").count(), 24);
        assert!(lines.iter().any(|l| l.contains("Edge. Orientation: Reversed")));
    }
}
