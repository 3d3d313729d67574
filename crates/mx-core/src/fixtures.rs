//! Small models shared by unit tests

use std::sync::Arc;

use glam::DVec3;
use mx_cad::{Axis3Placement, BodyType, Curve, Orientation, ShapeRef, Surface, Transformation};

use crate::model::Model;
use crate::representation::{BRepData, BRepRepresentation};
use crate::scene::{ElementId, Part};

/// Axis-aligned cube with shared edges and vertices: 6 faces, 12 edges, 8 vertices
pub(crate) fn cube(size: f64) -> BRepData {
    let mut data = BRepData::new();
    let store = data.store_mut();

    let corners: Vec<DVec3> = (0..8)
        .map(|i| {
            DVec3::new(
                (i & 1) as f64 * size,
                ((i >> 1) & 1) as f64 * size,
                ((i >> 2) & 1) as f64 * size,
            )
        })
        .collect();
    let vertices: Vec<_> = corners.iter().map(|&p| store.add_vertex(p, 1e-7)).collect();

    const EDGES: [(usize, usize); 12] = [
        (0, 1), (2, 3), (4, 5), (6, 7),
        (0, 2), (1, 3), (4, 6), (5, 7),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];
    let mut edges = Vec::new();
    for (a, b) in EDGES {
        let curve = Arc::new(Curve::line(corners[a], corners[b] - corners[a]));
        let edge = store.add_edge(curve, 0.0, size).unwrap();
        store.append(edge, ShapeRef::forward(vertices[a])).unwrap();
        store
            .append(edge, ShapeRef::new(vertices[b], Orientation::Reversed))
            .unwrap();
        edges.push(edge);
    }

    const FACES: [[usize; 4]; 6] = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    let mut faces = Vec::new();
    for quad in FACES {
        let wire_edges: Vec<ShapeRef> = (0..4)
            .map(|i| {
                let (a, b) = (quad[i], quad[(i + 1) % 4]);
                match EDGES.iter().position(|&e| e == (a, b)) {
                    Some(k) => ShapeRef::forward(edges[k]),
                    None => {
                        let k = EDGES.iter().position(|&e| e == (b, a)).unwrap();
                        ShapeRef::new(edges[k], Orientation::Reversed)
                    }
                }
            })
            .collect();
        let wire = store.add_wire(wire_edges).unwrap();
        let surface = Arc::new(Surface::plane(Axis3Placement::at(corners[quad[0]])));
        let face = store.add_face(surface);
        store.append(face, ShapeRef::forward(wire)).unwrap();
        faces.push(ShapeRef::forward(face));
    }

    let shell = store.add_shell(faces).unwrap();
    let solid = store.add_solid([ShapeRef::forward(shell)]).unwrap();
    let body = store
        .add_body(BodyType::Solid, [ShapeRef::forward(solid)])
        .unwrap();
    data.add_body(body).unwrap();
    data
}

pub(crate) struct NutBolt {
    pub model: Model,
    pub bolt: ElementId,
    pub nut: ElementId,
    pub assembly: ElementId,
    pub roots: Vec<ElementId>,
}

/// Two parts, one assembly instanced twice at the root, one bare root instance
///
/// ```text
/// root instance (x=0)  ─┐
/// root instance (x=10) ─┴─> nut-bolt ─┬─ instance (z=1) ─> bolt
///                                     └─ instance       ─> nut
/// root instance (y=5)  ───> bolt
/// ```
pub(crate) fn nut_bolt() -> NutBolt {
    let mut model = Model::new("nut-bolt");
    let bolt = model.add_part(
        Some("bolt"),
        Part::with_brep(BRepRepresentation::new(cube(1.0))),
    );
    let nut = model.add_part(
        Some("nut"),
        Part::with_brep(BRepRepresentation::new(cube(2.0))),
    );
    let assembly = model.add_assembly(Some("nut-bolt"));
    model
        .assembly_add_instance(
            assembly,
            bolt,
            Some(Transformation::from_translation(DVec3::Z)),
            Some("bolt-1"),
        )
        .unwrap();
    model
        .assembly_add_instance(assembly, nut, None, Some("nut-1"))
        .unwrap();

    let mut roots = Vec::new();
    for (offset, name) in [
        (DVec3::ZERO, "nut-bolt-1"),
        (DVec3::new(10.0, 0.0, 0.0), "nut-bolt-2"),
    ] {
        let root = model
            .add_instance(
                assembly,
                Some(Transformation::from_translation(offset)),
                Some(name),
            )
            .unwrap();
        model.add_root(root).unwrap();
        roots.push(root);
    }
    let loose = model
        .add_instance(
            bolt,
            Some(Transformation::from_translation(DVec3::new(0.0, 5.0, 0.0))),
            Some("loose-bolt"),
        )
        .unwrap();
    model.add_root(loose).unwrap();
    roots.push(loose);

    NutBolt {
        model,
        bolt,
        nut,
        assembly,
        roots,
    }
}
