//! Product manufacturing information
//!
//! Each element may carry a [`PmiTable`]. An entry pairs an optional
//! semantic description (datum, dimension, geometric tolerance) with an
//! optional graphical presentation (outlines, text, triangles).

use std::ops::ControlFlow;
use std::sync::Arc;

use glam::{DVec2, DVec3};
use mx_cad::{Curve, Curve2d, Visit, WalkOutcome};

use crate::poly::{IndexedTriangleSet, PolyLineSet};

#[derive(Debug, Clone, Default)]
pub struct PmiTable {
    entries: Vec<PmiData>,
}

impl PmiTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, data: PmiData) {
        self.entries.push(data);
    }

    pub fn entries(&self) -> &[PmiData] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PmiData {
    pub name: Option<String>,
    pub semantic: Option<SemanticElement>,
    pub graphical: Option<GraphicalElement>,
}

// ============== Semantic ==============

#[derive(Debug, Clone, Default)]
pub struct SemanticElement {
    pub components: Vec<SemanticComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionType {
    Linear,
    Angular,
    Radial,
    Diameter,
    Undefined,
}

impl DimensionType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Linear,
            1 => Self::Angular,
            2 => Self::Radial,
            3 => Self::Diameter,
            _ => Self::Undefined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceZoneForm {
    Cylindrical,
    Spherical,
    BetweenTwoLines,
    BetweenTwoSurfaces,
    Undefined,
}

impl ToleranceZoneForm {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Cylindrical,
            1 => Self::Spherical,
            2 => Self::BetweenTwoLines,
            3 => Self::BetweenTwoSurfaces,
            _ => Self::Undefined,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticComponentKind {
    Datum {
        label: String,
    },
    Dimension {
        nominal_value: f64,
        dimension_type: DimensionType,
    },
    GeometricTolerance {
        magnitude: f64,
        zone_form: ToleranceZoneForm,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticComponent {
    pub kind: SemanticComponentKind,
    pub attributes: Vec<SemanticAttribute>,
}

impl SemanticComponent {
    pub fn new(kind: SemanticComponentKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: SemanticAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticAttribute {
    Modifier(String),
    ModifierWithValue { modifier: String, value: f64 },
    Qualifier(String),
    PlusMinusBounds { lower: f64, upper: f64 },
    Range { lower: f64, upper: f64 },
    LimitsAndFits { value: f64, fit: String },
    DatumTarget { index: u32, description: String },
    DatumRef { precedence: u32, label: String },
    /// Group of datum references with their own modifiers
    DatumRefCompartment {
        references: Vec<SemanticAttribute>,
        modifiers: Vec<SemanticAttribute>,
    },
    MaximumValue(f64),
    Displacement(f64),
    LengthUnit(String),
    AngleUnit(String),
}

impl SemanticAttribute {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Modifier(_) => "Modifier",
            Self::ModifierWithValue { .. } => "ModifierWithValue",
            Self::Qualifier(_) => "Qualifier",
            Self::PlusMinusBounds { .. } => "PlusMinusBounds",
            Self::Range { .. } => "Range",
            Self::LimitsAndFits { .. } => "LimitsAndFits",
            Self::DatumTarget { .. } => "DatumTarget",
            Self::DatumRef { .. } => "DatumRef",
            Self::DatumRefCompartment { .. } => "DatumRefCompartment",
            Self::MaximumValue(_) => "MaximumValue",
            Self::Displacement(_) => "Displacement",
            Self::LengthUnit(_) => "LengthUnit",
            Self::AngleUnit(_) => "AngleUnit",
        }
    }
}

/// Callbacks for semantic PMI; `depth` grows inside datum reference compartments
pub trait PmiSemanticVisitor {
    fn visit_component(&mut self, _component: &SemanticComponent, _depth: usize) {}
    fn visit_attribute(&mut self, _attribute: &SemanticAttribute, _depth: usize) {}
}

pub fn walk_semantic<V: PmiSemanticVisitor + ?Sized>(element: &SemanticElement, visitor: &mut V) {
    for component in &element.components {
        visitor.visit_component(component, 0);
        for attribute in &component.attributes {
            walk_attribute(attribute, 1, visitor);
        }
    }
}

fn walk_attribute<V: PmiSemanticVisitor + ?Sized>(
    attribute: &SemanticAttribute,
    depth: usize,
    visitor: &mut V,
) {
    visitor.visit_attribute(attribute, depth);
    if let SemanticAttribute::DatumRefCompartment {
        references,
        modifiers,
    } = attribute
    {
        for nested in references.iter().chain(modifiers) {
            walk_attribute(nested, depth + 1, visitor);
        }
    }
}

// ============== Graphical ==============

#[derive(Debug, Clone, Default)]
pub struct GraphicalElement {
    pub components: Vec<GraphicalComponent>,
}

#[derive(Debug, Clone)]
pub enum Outline {
    Poly(PolyLineSet),
    Poly2d(Vec<Vec<DVec2>>),
    Curve(Arc<Curve>),
    Curve2d(Arc<Curve2d>),
    Composite(Vec<Outline>),
}

#[derive(Debug, Clone)]
pub enum GraphicalComponent {
    Outline(Outline),
    Text { text: String, position: DVec3 },
    Triangulated(IndexedTriangleSet),
}

/// Callbacks for graphical PMI; composite outlines get an enter/leave pair
pub trait PmiGraphicalVisitor {
    fn enter_composite(&mut self, _children: &[Outline], _depth: usize) -> Visit {
        Visit::Continue
    }
    fn leave_composite(&mut self, _children: &[Outline], _depth: usize) {}
    fn visit_poly_outline(&mut self, _lines: &PolyLineSet, _depth: usize) {}
    fn visit_poly2d_outline(&mut self, _lines: &[Vec<DVec2>], _depth: usize) {}
    fn visit_curve_outline(&mut self, _curve: &Curve, _depth: usize) {}
    fn visit_curve2d_outline(&mut self, _curve: &Curve2d, _depth: usize) {}
    fn visit_text(&mut self, _text: &str, _position: DVec3, _depth: usize) {}
    fn visit_triangulated(&mut self, _triangles: &IndexedTriangleSet, _depth: usize) {}
}

pub fn walk_graphical<V: PmiGraphicalVisitor + ?Sized>(
    element: &GraphicalElement,
    visitor: &mut V,
) -> WalkOutcome {
    for component in &element.components {
        let flow = match component {
            GraphicalComponent::Outline(outline) => walk_outline(outline, 0, visitor),
            GraphicalComponent::Text { text, position } => {
                visitor.visit_text(text, *position, 0);
                ControlFlow::Continue(())
            }
            GraphicalComponent::Triangulated(triangles) => {
                visitor.visit_triangulated(triangles, 0);
                ControlFlow::Continue(())
            }
        };
        if flow.is_break() {
            return WalkOutcome::Aborted;
        }
    }
    WalkOutcome::Completed
}

fn walk_outline<V: PmiGraphicalVisitor + ?Sized>(
    outline: &Outline,
    depth: usize,
    visitor: &mut V,
) -> ControlFlow<()> {
    match outline {
        Outline::Poly(lines) => visitor.visit_poly_outline(lines, depth),
        Outline::Poly2d(lines) => visitor.visit_poly2d_outline(lines, depth),
        Outline::Curve(curve) => visitor.visit_curve_outline(curve, depth),
        Outline::Curve2d(curve) => visitor.visit_curve2d_outline(curve, depth),
        Outline::Composite(children) => {
            match visitor.enter_composite(children, depth) {
                Visit::Abort => return ControlFlow::Break(()),
                Visit::SkipChildren => {}
                Visit::Continue => {
                    for child in children {
                        walk_outline(child, depth + 1, visitor)?;
                    }
                }
            }
            visitor.leave_composite(children, depth);
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compartment_attributes_are_nested() {
        #[derive(Default)]
        struct Collect(Vec<(String, usize)>);
        impl PmiSemanticVisitor for Collect {
            fn visit_component(&mut self, _: &SemanticComponent, depth: usize) {
                self.0.push(("component".into(), depth));
            }
            fn visit_attribute(&mut self, attribute: &SemanticAttribute, depth: usize) {
                self.0.push((attribute.kind_name().into(), depth));
            }
        }

        let tolerance = SemanticComponent::new(SemanticComponentKind::GeometricTolerance {
            magnitude: 0.05,
            zone_form: ToleranceZoneForm::Cylindrical,
        })
        .with_attribute(SemanticAttribute::DatumRefCompartment {
            references: vec![SemanticAttribute::DatumRef {
                precedence: 1,
                label: "A".into(),
            }],
            modifiers: vec![SemanticAttribute::Modifier("MMC".into())],
        })
        .with_attribute(SemanticAttribute::LengthUnit("mm".into()));

        let mut collect = Collect::default();
        walk_semantic(
            &SemanticElement {
                components: vec![tolerance],
            },
            &mut collect,
        );
        assert_eq!(
            collect.0,
            vec![
                ("component".to_string(), 0),
                ("DatumRefCompartment".to_string(), 1),
                ("DatumRef".to_string(), 2),
                ("Modifier".to_string(), 2),
                ("LengthUnit".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_composite_outline_enter_leave() {
        #[derive(Default)]
        struct Trace(Vec<String>);
        impl PmiGraphicalVisitor for Trace {
            fn enter_composite(&mut self, children: &[Outline], depth: usize) -> Visit {
                self.0.push(format!("enter {} @{depth}", children.len()));
                Visit::from_descend(depth == 0)
            }
            fn leave_composite(&mut self, _: &[Outline], depth: usize) {
                self.0.push(format!("leave @{depth}"));
            }
            fn visit_curve_outline(&mut self, curve: &Curve, depth: usize) {
                self.0.push(format!("{} @{depth}", curve.curve_type().name()));
            }
            fn visit_text(&mut self, text: &str, _: DVec3, _: usize) {
                self.0.push(text.to_string());
            }
        }

        let line = Arc::new(Curve::line(DVec3::ZERO, DVec3::X));
        let inner = Outline::Composite(vec![Outline::Curve(line.clone())]);
        let outer = Outline::Composite(vec![Outline::Curve(line), inner]);
        let element = GraphicalElement {
            components: vec![
                GraphicalComponent::Outline(outer),
                GraphicalComponent::Text {
                    text: "Ø10".into(),
                    position: DVec3::ZERO,
                },
            ],
        };

        let mut trace = Trace::default();
        assert!(walk_graphical(&element, &mut trace).is_completed());
        assert_eq!(
            trace.0,
            vec!["enter 2 @0", "Line @1", "enter 1 @1", "leave @1", "leave @0", "Ø10"]
        );
    }

    #[test]
    fn test_unknown_codes_are_undefined() {
        assert_eq!(DimensionType::from_code(99), DimensionType::Undefined);
        assert_eq!(ToleranceZoneForm::from_code(-3), ToleranceZoneForm::Undefined);
    }
}
