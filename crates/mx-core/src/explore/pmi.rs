//! Tree-shaped dump of the PMI attached to elements

use glam::{DVec2, DVec3};
use mx_cad::{Curve, Curve2d, Visit};

use super::reachable_elements;
use crate::error::ModelResult;
use crate::model::Model;
use crate::pmi::{
    Outline, PmiGraphicalVisitor, PmiSemanticVisitor, SemanticAttribute, SemanticComponent,
    SemanticComponentKind, walk_graphical, walk_semantic,
};
use crate::poly::{IndexedTriangleSet, PolyLineSet};

#[derive(Debug, Clone)]
pub struct ElementPmi {
    pub element: String,
    pub lines: Vec<String>,
}

struct Printer {
    lines: Vec<String>,
    /// Indentation of the current PMI entry
    base: usize,
}

impl Printer {
    fn push(&mut self, depth: usize, text: String) {
        self.lines
            .push(format!("{}{text}", "  ".repeat(self.base + depth)));
    }
}

impl PmiSemanticVisitor for Printer {
    fn visit_component(&mut self, component: &SemanticComponent, depth: usize) {
        let text = match &component.kind {
            SemanticComponentKind::Datum { label } => format!("Datum {label}"),
            SemanticComponentKind::Dimension {
                nominal_value,
                dimension_type,
            } => format!("Dimension {dimension_type:?} {nominal_value}"),
            SemanticComponentKind::GeometricTolerance {
                magnitude,
                zone_form,
            } => format!("Geometric tolerance {magnitude} zone {zone_form:?}"),
        };
        self.push(depth, text);
    }

    fn visit_attribute(&mut self, attribute: &SemanticAttribute, depth: usize) {
        let detail = match attribute {
            SemanticAttribute::Modifier(m) | SemanticAttribute::Qualifier(m) => format!(" {m}"),
            SemanticAttribute::ModifierWithValue { modifier, value } => {
                format!(" {modifier} = {value}")
            }
            SemanticAttribute::PlusMinusBounds { lower, upper }
            | SemanticAttribute::Range { lower, upper } => format!(" [{lower}, {upper}]"),
            SemanticAttribute::LimitsAndFits { value, fit } => format!(" {value} {fit}"),
            SemanticAttribute::DatumTarget { index, description } => {
                format!(" {index} {description}")
            }
            SemanticAttribute::DatumRef { precedence, label } => {
                format!(" {label} (precedence {precedence})")
            }
            SemanticAttribute::DatumRefCompartment {
                references,
                modifiers,
            } => format!(" {} references, {} modifiers", references.len(), modifiers.len()),
            SemanticAttribute::MaximumValue(v) | SemanticAttribute::Displacement(v) => {
                format!(" {v}")
            }
            SemanticAttribute::LengthUnit(u) | SemanticAttribute::AngleUnit(u) => format!(" {u}"),
        };
        self.push(depth, format!("{}{detail}", attribute.kind_name()));
    }
}

impl PmiGraphicalVisitor for Printer {
    fn enter_composite(&mut self, children: &[Outline], depth: usize) -> Visit {
        self.push(depth, format!("Composite outline ({} items)", children.len()));
        Visit::Continue
    }

    fn visit_poly_outline(&mut self, lines: &PolyLineSet, depth: usize) {
        self.push(
            depth,
            format!("Poly outline: {} polylines", lines.number_of_polylines()),
        );
    }

    fn visit_poly2d_outline(&mut self, lines: &[Vec<DVec2>], depth: usize) {
        self.push(depth, format!("2D poly outline: {} polylines", lines.len()));
    }

    fn visit_curve_outline(&mut self, curve: &Curve, depth: usize) {
        self.push(depth, format!("Curve outline: {}", curve.curve_type().name()));
    }

    fn visit_curve2d_outline(&mut self, curve: &Curve2d, depth: usize) {
        self.push(depth, format!("2D curve outline: {}", curve.curve_type().name()));
    }

    fn visit_text(&mut self, text: &str, position: DVec3, depth: usize) {
        self.push(
            depth,
            format!("Text \"{text}\" at ({}, {}, {})", position.x, position.y, position.z),
        );
    }

    fn visit_triangulated(&mut self, triangles: &IndexedTriangleSet, depth: usize) {
        self.push(
            depth,
            format!("Triangulated: {} triangles", triangles.number_of_faces()),
        );
    }
}

/// One dump per distinct element carrying a non-empty PMI table
pub fn explore_pmi(model: &Model) -> ModelResult<Vec<ElementPmi>> {
    let mut result = Vec::new();
    for id in reachable_elements(model) {
        let node = model.element(id)?;
        let Some(table) = node.common.pmi.as_ref().filter(|t| !t.is_empty()) else {
            continue;
        };
        let mut printer = Printer {
            lines: Vec::new(),
            base: 0,
        };
        for data in table.entries() {
            printer.base = 0;
            printer.push(0, format!("PMI Data: {}", data.name.as_deref().unwrap_or("unnamed")));
            printer.base = 1;
            if let Some(semantic) = &data.semantic {
                printer.push(0, "Semantic:".into());
                printer.base = 2;
                walk_semantic(semantic, &mut printer);
                printer.base = 1;
            }
            if let Some(graphical) = &data.graphical {
                printer.push(0, "Graphical:".into());
                printer.base = 2;
                walk_graphical(graphical, &mut printer);
            }
        }
        result.push(ElementPmi {
            element: node.display_name().to_owned(),
            lines: printer.lines,
        });
    }
    Ok(result)
}
