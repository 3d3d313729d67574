//! Built-in nut-and-bolt sample model

use std::f64::consts::TAU;
use std::path::Path;
use std::sync::Arc;

use glam::{DVec2, DVec3};
use mx_cad::{
    Axis3Placement, BodyType, Curve, Orientation, ShapeId, ShapeRef, Surface, Transformation,
};
use mx_core::exchange::{ExchangeError, ExchangeResult, ReaderParameters};
use mx_core::pmi::{
    DimensionType, GraphicalComponent, GraphicalElement, Outline, SemanticAttribute,
    SemanticComponent, SemanticComponentKind, SemanticElement,
};
use mx_core::{
    Appearance, BRepData, BRepRepresentation, Color, Model, ModelReader, ModelResult, Part,
    PmiData, PmiTable, ProgressScope,
};

/// Path understood by [`SampleReader`]
pub const SAMPLE_PATH: &str = "sample:nut-bolt";

const NUT_WIDTH: f64 = 10.0;
const NUT_HEIGHT: f64 = 4.0;
const BOLT_WIDTH: f64 = 5.0;
const BOLT_LENGTH: f64 = 20.0;
const HOLE_RADIUS: f64 = 2.5;

fn regular_polygon(sides: usize, across_corners: f64) -> Vec<DVec2> {
    (0..sides)
        .map(|i| DVec2::from_angle(TAU * i as f64 / sides as f64) * across_corners / 2.0)
        .collect()
}

fn segment(
    data: &mut BRepData,
    from: (ShapeId, DVec3),
    to: (ShapeId, DVec3),
) -> ModelResult<ShapeId> {
    let store = data.store_mut();
    let curve = Arc::new(Curve::line(from.1, to.1 - from.1));
    let edge = store.add_edge(curve, 0.0, from.1.distance(to.1))?;
    store.append(edge, ShapeRef::forward(from.0))?;
    store.append(edge, ShapeRef::new(to.0, Orientation::Reversed))?;
    Ok(edge)
}

fn planar_face(
    data: &mut BRepData,
    origin: DVec3,
    normal: DVec3,
    x: DVec3,
    wire: ShapeId,
) -> ModelResult<ShapeId> {
    let position = Axis3Placement::new(origin, normal, x)?;
    let store = data.store_mut();
    let face = store.add_face(Arc::new(Surface::plane(position)));
    store.append(face, ShapeRef::forward(wire))?;
    Ok(face)
}

/// Circular hole through a cap face, as a reversed inner wire
fn hole(data: &mut BRepData, face: ShapeId, z: f64) -> ModelResult<()> {
    let center = DVec3::new(0.0, 0.0, z);
    let store = data.store_mut();
    let curve = Arc::new(Curve::circle(Axis3Placement::at(center), HOLE_RADIUS));
    let edge = store.add_edge(curve, 0.0, TAU)?;
    let seam = store.add_vertex(center + DVec3::X * HOLE_RADIUS, 1e-7);
    store.append(edge, ShapeRef::forward(seam))?;
    store.append(edge, ShapeRef::new(seam, Orientation::Reversed))?;
    let wire = store.add_wire([ShapeRef::forward(edge)])?;
    store.append(face, ShapeRef::new(wire, Orientation::Reversed))?;
    Ok(())
}

/// Straight prism over a convex `outline`, edges and vertices shared between faces
fn prism(outline: &[DVec2], height: f64, with_hole: bool) -> ModelResult<BRepData> {
    let mut data = BRepData::new();
    let n = outline.len();
    let mut bottom = Vec::with_capacity(n);
    let mut top = Vec::with_capacity(n);
    for p in outline {
        let (b, t) = (p.extend(0.0), p.extend(height));
        bottom.push((data.store_mut().add_vertex(b, 1e-7), b));
        top.push((data.store_mut().add_vertex(t, 1e-7), t));
    }

    let mut bottom_ring = Vec::with_capacity(n);
    let mut top_ring = Vec::with_capacity(n);
    let mut verticals = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        bottom_ring.push(segment(&mut data, bottom[i], bottom[j])?);
        top_ring.push(segment(&mut data, top[i], top[j])?);
        verticals.push(segment(&mut data, bottom[i], top[i])?);
    }

    let mut faces = Vec::with_capacity(n + 2);
    for i in 0..n {
        let j = (i + 1) % n;
        let wire = data.store_mut().add_wire([
            ShapeRef::forward(bottom_ring[i]),
            ShapeRef::forward(verticals[j]),
            ShapeRef::new(top_ring[i], Orientation::Reversed),
            ShapeRef::new(verticals[i], Orientation::Reversed),
        ])?;
        let along = bottom[j].1 - bottom[i].1;
        let normal = along.cross(DVec3::Z);
        faces.push(planar_face(&mut data, bottom[i].1, normal, along, wire)?);
    }

    let wire = data.store_mut().add_wire(
        bottom_ring
            .iter()
            .rev()
            .map(|&e| ShapeRef::new(e, Orientation::Reversed)),
    )?;
    let cap_bottom = planar_face(&mut data, DVec3::ZERO, DVec3::NEG_Z, DVec3::X, wire)?;
    let wire = data
        .store_mut()
        .add_wire(top_ring.iter().map(|&e| ShapeRef::forward(e)))?;
    let cap_top = planar_face(&mut data, DVec3::Z * height, DVec3::Z, DVec3::X, wire)?;
    if with_hole {
        hole(&mut data, cap_bottom, 0.0)?;
        hole(&mut data, cap_top, height)?;
    }
    faces.extend([cap_bottom, cap_top]);

    let store = data.store_mut();
    let shell = store.add_shell(faces.into_iter().map(ShapeRef::forward))?;
    let solid = store.add_solid([ShapeRef::forward(shell)])?;
    let body = store.add_body(BodyType::Solid, [ShapeRef::forward(solid)])?;
    data.add_body(body)?;
    Ok(data)
}

fn nut_pmi() -> PmiTable {
    let mut table = PmiTable::new();
    table.add(PmiData {
        name: Some("Thread bore".into()),
        semantic: Some(SemanticElement {
            components: vec![
                SemanticComponent::new(SemanticComponentKind::Dimension {
                    nominal_value: 2.0 * HOLE_RADIUS,
                    dimension_type: DimensionType::Diameter,
                })
                .with_attribute(SemanticAttribute::PlusMinusBounds {
                    lower: -0.05,
                    upper: 0.05,
                })
                .with_attribute(SemanticAttribute::LengthUnit("mm".into())),
            ],
        }),
        graphical: Some(GraphicalElement {
            components: vec![
                GraphicalComponent::Outline(Outline::Curve(Arc::new(Curve::circle(
                    Axis3Placement::at(DVec3::Z * NUT_HEIGHT),
                    HOLE_RADIUS,
                )))),
                GraphicalComponent::Text {
                    text: format!("Ø{}", 2.0 * HOLE_RADIUS),
                    position: DVec3::new(NUT_WIDTH, 0.0, NUT_HEIGHT),
                },
            ],
        }),
    });
    table
}

/// Two nut-bolt assemblies side by side and a spare nut
pub fn nut_bolt() -> ModelResult<Model> {
    let mut model = Model::new("nut-bolt");

    let steel = Arc::new(Appearance::new(Color::from_rgb8(176, 180, 186)));
    let red = Arc::new(Appearance::new(Color::RED));
    let blue = Arc::new(Appearance::new(Color::BLUE));

    let mut bolt_data = prism(&regular_polygon(4, BOLT_WIDTH), BOLT_LENGTH, false)?;
    let bolt_body = bolt_data.bodies()[0];
    bolt_data.set_appearance(bolt_body, red.clone());
    bolt_data.properties_mut(bolt_body).insert("Thread", "M5");
    let bolt = model.add_part(Some("bolt"), Part::with_brep(BRepRepresentation::new(bolt_data)));

    let mut nut_data = prism(&regular_polygon(6, NUT_WIDTH), NUT_HEIGHT, true)?;
    let first_face = nut_data
        .store()
        .ids()
        .find(|&id| nut_data.store().face(id).is_some());
    if let Some(face) = first_face {
        nut_data.set_appearance(face, blue.clone());
    }
    let nut = model.add_part(Some("nut"), Part::with_brep(BRepRepresentation::new(nut_data)));
    {
        let node = model.element_mut(nut)?;
        node.common.appearance = Some(steel);
        node.common.properties.insert("Material", "Steel");
        node.common.properties.insert("Mass", 0.012);
        node.common.pmi = Some(nut_pmi());
    }

    let assembly = model.add_assembly(Some("nut-bolt"));
    model.assembly_add_instance(
        assembly,
        bolt,
        Some(Transformation::from_translation(DVec3::new(0.0, 0.0, -5.0))),
        Some("bolt-1"),
    )?;
    model.assembly_add_instance(assembly, nut, None, Some("nut-1"))?;
    model.element_mut(assembly)?.common.properties.insert("Revision", 3);

    for (i, x) in [0.0, 25.0].into_iter().enumerate() {
        let name = format!("nut-bolt-{}", i + 1);
        let root = model.add_instance(
            assembly,
            Some(Transformation::from_translation(DVec3::new(x, 0.0, 0.0))),
            Some(name.as_str()),
        )?;
        model.add_root(root)?;
    }
    let spare_placement = Transformation::from_translation(DVec3::new(0.0, 20.0, 0.0))
        .multiplied(&Transformation::from_rotation(DVec3::X, TAU / 4.0)?);
    let spare = model.add_instance(nut, Some(spare_placement), Some("spare-nut"))?;
    model.add_root(spare)?;
    Ok(model)
}

/// Reader serving the built-in sample under [`SAMPLE_PATH`]
#[derive(Default)]
pub struct SampleReader {
    pending: Option<Model>,
}

impl ModelReader for SampleReader {
    fn name(&self) -> &str {
        "sample"
    }

    fn open(
        &mut self,
        path: &Path,
        _params: &ReaderParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<()> {
        if path != Path::new(SAMPLE_PATH) {
            return Err(ExchangeError::Read(format!(
                "unknown sample {}",
                path.display()
            )));
        }
        self.pending = Some(nut_bolt()?);
        if let Some(p) = progress {
            p.set_fraction(1.0);
        }
        Ok(())
    }

    fn transfer(&mut self, _progress: Option<&ProgressScope<'_>>) -> ExchangeResult<Model> {
        self.pending
            .take()
            .ok_or_else(|| ExchangeError::Read("nothing was opened".into()))
    }
}
