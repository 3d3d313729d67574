//! Structure signature of a model

use std::fmt;

use mx_cad::{ShapeType, unique_subshapes};

use super::reachable_elements;
use crate::error::ModelResult;
use crate::model::Model;
use crate::scene::ElementKind;

/// Distinct reachable elements by type, plus representation content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub roots: usize,
    pub parts: usize,
    pub assemblies: usize,
    pub instances: usize,
    /// Distinct B-Rep faces over all parts
    pub faces: usize,
    /// Triangles of the latest poly representation of each part
    pub triangles: usize,
}

impl SceneStats {
    pub fn of(model: &Model) -> ModelResult<Self> {
        let mut stats = Self {
            roots: model.number_of_roots(),
            ..Self::default()
        };
        for id in reachable_elements(model) {
            match &model.element(id)?.kind {
                ElementKind::Assembly(_) => stats.assemblies += 1,
                ElementKind::Instance(_) => stats.instances += 1,
                ElementKind::Part(part) => {
                    stats.parts += 1;
                    if let Some(brep) = part.brep() {
                        let data = brep.data()?;
                        for body in data.body_refs() {
                            stats.faces +=
                                unique_subshapes(data.store(), body, ShapeType::Face).len();
                        }
                    }
                    if let Some(poly) = part.latest_poly() {
                        stats.triangles += poly.get()?.number_of_triangles();
                    }
                }
            }
        }
        Ok(stats)
    }

    /// Counts that do not depend on representation content
    pub fn structure(&self) -> (usize, usize, usize, usize) {
        (self.roots, self.parts, self.assemblies, self.instances)
    }
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} roots, {} parts, {} assemblies, {} instances, {} faces, {} triangles",
            self.roots, self.parts, self.assemblies, self.instances, self.faces, self.triangles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::testing::QuadMesher;
    use crate::exchange::{
        ExchangeResult, Mesher, MesherParameters, Simplifier, SimplifierParameters,
    };
    use crate::fixtures::nut_bolt;
    use crate::progress::ProgressScope;
    use crate::representation::BRepRepresentation;

    /// Drops every B-Rep and keeps only the first poly representation
    struct DropBRep;

    impl Simplifier for DropBRep {
        fn name(&self) -> &str {
            "drop-brep"
        }

        fn perform(
            &self,
            model: &Model,
            _params: &SimplifierParameters,
            _progress: Option<&ProgressScope<'_>>,
        ) -> ExchangeResult<Model> {
            let mut simplified = model.duplicate();
            let parts: Vec<_> = reachable_elements(model)
                .into_iter()
                .filter(|&id| model.part(id).is_ok())
                .collect();
            for id in parts {
                let part = simplified.part_mut(id)?;
                let first = part.polys().first().cloned();
                part.replace_brep(BRepRepresentation::default());
                part.clear_polys();
                if let Some(poly) = first {
                    part.add_poly(poly);
                }
            }
            Ok(simplified)
        }
    }

    #[test]
    fn test_fixture_stats() {
        let fixture = nut_bolt();
        let stats = SceneStats::of(&fixture.model).unwrap();
        assert_eq!(
            stats,
            SceneStats {
                roots: 3,
                parts: 2,
                assemblies: 1,
                instances: 5,
                faces: 12,
                triangles: 0,
            }
        );
        assert_eq!(
            stats.to_string(),
            "3 roots, 2 parts, 1 assemblies, 5 instances, 12 faces, 0 triangles"
        );
    }

    #[test]
    fn test_processing_preserves_structure() {
        let mut fixture = nut_bolt();
        let before = SceneStats::of(&fixture.model).unwrap();

        QuadMesher::default()
            .compute_model(&mut fixture.model, &MesherParameters::coarse(), None)
            .unwrap();
        QuadMesher::default()
            .compute_model(&mut fixture.model, &MesherParameters::fine(), None)
            .unwrap();
        let meshed = SceneStats::of(&fixture.model).unwrap();
        assert_eq!(meshed.structure(), before.structure());
        assert_eq!(meshed.triangles, 24);

        let simplified = DropBRep
            .perform(&fixture.model, &SimplifierParameters::default(), None)
            .unwrap();
        let after = SceneStats::of(&simplified).unwrap();
        assert_eq!(after.structure(), before.structure());
        assert_eq!(after.faces, 0);
        assert_eq!(after.triangles, 24);
        // the source model is untouched and keeps its own identities
        assert_eq!(SceneStats::of(&fixture.model).unwrap(), meshed);
        let poly_id = |model: &Model| model.part(fixture.bolt).unwrap().polys()[0].id();
        assert_ne!(poly_id(&simplified), poly_id(&fixture.model));
    }
}
