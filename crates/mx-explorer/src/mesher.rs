//! Mesher for planar faces bounded by lines and circles

use glam::DVec3;
use mx_cad::{CurveType, Orientation, ShapeRef, ShapeStore, ShapeType, Surface, unique_subshapes};
use mx_core::exchange::{ExchangeError, ExchangeResult};
use mx_core::{
    BRepRepresentation, IndexedTriangleSet, Mesher, MesherParameters, PolyData, PolyLineSet,
    PolyRepresentation, PolyVertexSet, ProgressScope,
};

/// Fan-triangulates the outer boundary of each planar face and samples every edge
///
/// Inner wires are only sampled as polylines; they are not cut out of the
/// triangles. Non-planar faces are skipped with a warning.
#[derive(Debug, Default)]
pub struct PlanarMesher;

/// Upper bound on samples per curved edge
const MAX_SEGMENTS: usize = 4096;

fn segments(angle: f64, params: &MesherParameters) -> ExchangeResult<usize> {
    let (angular, _) = params.deflections()?;
    if !angle.is_finite() {
        return Err(ExchangeError::Mesh(format!("cannot sample an edge over {}", angle)));
    }
    Ok(((angle.abs() / angular).ceil() as usize).clamp(4, MAX_SEGMENTS))
}

/// Points along an edge use, in use direction, end point excluded
fn sample_edge(
    store: &ShapeStore,
    edge: ShapeRef,
    params: &MesherParameters,
) -> ExchangeResult<Vec<DVec3>> {
    let Some(data) = store.edge(edge.id) else {
        return Ok(Vec::new());
    };
    let (first, last) = data.range;
    let parameters: Vec<f64> = match &data.curve {
        Some(curve) if curve.curve_type() != CurveType::Line => {
            let n = segments(last - first, params)?;
            (0..n).map(|i| first + (last - first) * i as f64 / n as f64).collect()
        }
        _ => vec![first],
    };
    let mut points: Vec<DVec3> = match &data.curve {
        Some(curve) => parameters.iter().filter_map(|&t| curve.value(t)).collect(),
        None => Vec::new(),
    };
    if points.is_empty() {
        points = data
            .vertices
            .first()
            .and_then(|v| store.vertex(v.id))
            .map(|v| vec![v.point])
            .unwrap_or_default();
    }
    if edge.orientation == Orientation::Reversed {
        let end = data
            .vertices
            .get(1)
            .and_then(|v| store.vertex(v.id))
            .map(|v| v.point)
            .or_else(|| data.curve.as_ref().and_then(|c| c.value(last)));
        points.reverse();
        // reversed use starts at the far end and stops before the near one
        if let Some(end) = end {
            points.pop();
            points.insert(0, end);
        }
    }
    Ok(points)
}

fn wire_points(
    store: &ShapeStore,
    wire: ShapeRef,
    params: &MesherParameters,
) -> ExchangeResult<Vec<DVec3>> {
    let mut points = Vec::new();
    for edge in store.children(wire) {
        points.extend(sample_edge(store, edge, params)?);
    }
    Ok(points)
}

impl Mesher for PlanarMesher {
    fn name(&self) -> &str {
        "planar"
    }

    fn compute(
        &self,
        brep: &BRepRepresentation,
        params: &MesherParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<PolyRepresentation> {
        params.deflections()?;
        brep.get_with_progress(progress)?;
        let data = brep.data()?;
        let store = data.store();
        let mut poly = PolyData::new();

        for body in data.body_refs() {
            let faces = unique_subshapes(store, body, ShapeType::Face);
            for (done, &face_id) in faces.iter().enumerate() {
                if progress.is_some_and(|p| p.was_canceled()) {
                    return Err(ExchangeError::Canceled);
                }
                let Some(face) = store.face(face_id) else {
                    continue;
                };
                let Some(Surface::Plane { position }) = face.surface.as_deref() else {
                    tracing::warn!("Face {} is not planar, skipping", face_id);
                    continue;
                };
                let Some(outer) = face.outer else {
                    continue;
                };
                let points = wire_points(store, outer, params)?;
                if points.len() < 3 {
                    tracing::warn!("Face {} has a degenerate boundary", face_id);
                    continue;
                }

                let count = points.len();
                let indices: Vec<u32> = (0..count as u32).collect();
                let mut triangles = IndexedTriangleSet::new();
                triangles.add_coordinates(points, &indices, &[count])?;
                triangles.set_normals(vec![position.axis(); count])?;
                poly.add_from_source(PolyVertexSet::Triangles(triangles), face_id);

                if let Some(p) = progress {
                    p.set_fraction(0.8 * (done + 1) as f64 / faces.len() as f64);
                }
            }

            for edge in unique_subshapes(store, body, ShapeType::Edge) {
                let mut points = sample_edge(store, ShapeRef::forward(edge), params)?;
                let end = store.edge(edge).and_then(|e| {
                    e.vertices
                        .get(1)
                        .and_then(|v| store.vertex(v.id))
                        .map(|v| v.point)
                });
                points.extend(end);
                if points.len() < 2 {
                    continue;
                }
                let mut lines = PolyLineSet::new();
                lines.add_polyline(points)?;
                poly.add_from_source(PolyVertexSet::LineSet(lines), edge);
            }
        }

        tracing::debug!(
            "Meshed {} poly shapes, {} triangles",
            poly.len(),
            poly.number_of_triangles()
        );
        Ok(PolyRepresentation::new(poly))
    }
}
