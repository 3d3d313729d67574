//! Poly representation dump

use std::fmt;

use indexmap::IndexMap;

use super::reachable_elements;
use crate::error::ModelResult;
use crate::model::Model;
use crate::poly::PolyVertexSet;
use crate::representation::Lod;
use crate::scene::ElementKind;

#[derive(Debug, Clone)]
pub struct PartPoly {
    pub part: String,
    pub lod: Option<Lod>,
    pub shapes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PolyReport {
    /// Latest poly representation of each part that has one
    pub parts: Vec<PartPoly>,
    /// Triangles over all poly representations, per LOD
    pub triangles_per_lod: IndexMap<Option<Lod>, usize>,
}

fn describe_set(set: &PolyVertexSet) -> String {
    match set {
        PolyVertexSet::PointSet(points) => {
            format!("{}: {} points", set.kind_name(), points.number_of_points())
        }
        PolyVertexSet::LineSet(lines) => format!(
            "{}: {} polylines, {} points",
            set.kind_name(),
            lines.number_of_polylines(),
            lines.number_of_points()
        ),
        PolyVertexSet::Triangles(its) => {
            let mut text = format!(
                "{}: {} triangles, {} vertices",
                set.kind_name(),
                its.number_of_faces(),
                its.number_of_vertices()
            );
            for (present, what) in [
                (its.has_normals(), "normals"),
                (its.has_colors(), "colors"),
                (its.has_uvs(), "uvs"),
            ] {
                if present {
                    text.push_str(", ");
                    text.push_str(what);
                }
            }
            text
        }
    }
}

pub fn explore_poly(model: &Model) -> ModelResult<PolyReport> {
    let mut report = PolyReport::default();
    for id in reachable_elements(model) {
        let node = model.element(id)?;
        let ElementKind::Part(part) = &node.kind else {
            continue;
        };
        for poly in part.polys() {
            *report.triangles_per_lod.entry(poly.lod()).or_default() +=
                poly.get()?.number_of_triangles();
        }
        if let Some(latest) = part.latest_poly() {
            report.parts.push(PartPoly {
                part: node.display_name().to_owned(),
                lod: latest.lod(),
                shapes: latest
                    .get()?
                    .shapes()
                    .map(|(_, shape)| describe_set(&shape.set))
                    .collect(),
            });
        }
    }
    Ok(report)
}

impl fmt::Display for PolyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            let lod = part.lod.map_or("authored".to_owned(), |l| format!("{l:?}"));
            writeln!(f, "Part {} ({lod}):", part.part)?;
            for shape in &part.shapes {
                writeln!(f, "  {shape}")?;
            }
        }
        for (lod, triangles) in &self.triangles_per_lod {
            let lod = lod.map_or("authored".to_owned(), |l| format!("{l:?}"));
            writeln!(f, "{lod}: {triangles} triangles")?;
        }
        Ok(())
    }
}
