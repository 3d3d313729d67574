//! Collaborators of the document model: readers, writers, meshers,
//! simplifiers and the license gate in front of them
//!
//! The model never talks to a file format or a mesher directly; it goes
//! through these traits. Each has a `Null…` implementation that reports
//! [`ExchangeError::Unavailable`], for builds without a backend.

mod options;
mod pipeline;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexSet;
use mx_cad::{ShapeId, ShapeType};
use thiserror::Error;

use crate::error::ModelError;
use crate::model::Model;
use crate::progress::ProgressScope;
use crate::representation::{BRepRepresentation, PolyLink, PolyRepresentation};
use crate::scene::{ElementId, Part};
use crate::traverse::{EditQueue, ElementVisitor, VisitContext};

pub use options::{
    FileFormat, MesherParameters, ReaderParameters, SimplificationLevel, SimplifierParameters,
    WriterParameters,
};
pub use pipeline::{export, import_and_mesh, simplify};

/// Error type for exchange operations
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("License is not activated")]
    LicenseNotActivated,

    #[error("License activation failed: {0}")]
    License(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Meshing failed: {0}")]
    Mesh(String),

    #[error("Simplification failed: {0}")]
    Simplify(String),

    #[error("Operation was canceled")]
    Canceled,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;

fn check_canceled(progress: Option<&ProgressScope<'_>>) -> ExchangeResult<()> {
    if progress.is_some_and(|p| p.was_canceled()) {
        Err(ExchangeError::Canceled)
    } else {
        Ok(())
    }
}

// ============== Reader ==============

/// Two-phase file reader: `open` parses, `transfer` builds the model
pub trait ModelReader: Send {
    fn name(&self) -> &str;

    fn open(
        &mut self,
        path: &Path,
        params: &ReaderParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<()>;

    fn transfer(&mut self, progress: Option<&ProgressScope<'_>>) -> ExchangeResult<Model>;

    /// `open` then `transfer`, splitting the scope 25 / 75
    fn read(
        &mut self,
        path: &Path,
        params: &ReaderParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<Model> {
        {
            let scope = progress.map(|p| p.child(25.0));
            self.open(path, params, scope.as_ref())?;
        }
        check_canceled(progress)?;
        let scope = progress.map(|p| p.child(ProgressScope::REMAINING));
        let model = self.transfer(scope.as_ref())?;
        tracing::info!(
            "Read {} with {}: {} elements, {} roots",
            path.display(),
            self.name(),
            model.number_of_elements(),
            model.number_of_roots()
        );
        Ok(model)
    }
}

#[derive(Debug, Default)]
pub struct NullReader;

impl ModelReader for NullReader {
    fn name(&self) -> &str {
        "null"
    }

    fn open(
        &mut self,
        path: &Path,
        _params: &ReaderParameters,
        _progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<()> {
        Err(ExchangeError::Unavailable(format!(
            "no reader for {}",
            path.display()
        )))
    }

    fn transfer(&mut self, _progress: Option<&ProgressScope<'_>>) -> ExchangeResult<Model> {
        Err(ExchangeError::Unavailable("no reader".into()))
    }
}

// ============== Writer ==============

pub trait ModelWriter: Send + Sync {
    fn name(&self) -> &str;

    fn write(
        &self,
        model: &Model,
        path: &Path,
        params: &WriterParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<()>;
}

#[derive(Debug, Default)]
pub struct NullWriter;

impl ModelWriter for NullWriter {
    fn name(&self) -> &str {
        "null"
    }

    fn write(
        &self,
        _model: &Model,
        path: &Path,
        params: &WriterParameters,
        _progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<()> {
        Err(ExchangeError::Unavailable(format!(
            "no {:?} writer for {}",
            params.file_format,
            path.display()
        )))
    }
}

// ============== Mesher ==============

/// Computes poly representations from B-Rep representations
pub trait Mesher: Send + Sync {
    fn name(&self) -> &str;

    /// Mesh one B-Rep representation
    ///
    /// Poly shapes generated from a face or an edge should be added with
    /// [`PolyData::add_from_source`](crate::representation::PolyData::add_from_source)
    /// so that associations can be recorded.
    fn compute(
        &self,
        brep: &BRepRepresentation,
        params: &MesherParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<PolyRepresentation>;

    /// Mesh every part of `model` once, however many times it is instanced
    ///
    /// The new poly representation is added to each part after the walk.
    /// Returns the number of parts meshed.
    fn compute_model(
        &self,
        model: &mut Model,
        params: &MesherParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<usize> {
        params.deflections()?;
        let mut collector = PartCollector::default();
        model.accept(&mut collector);
        let parts = collector.parts;
        if parts.is_empty() {
            return Ok(0);
        }

        let weight = 100.0 / parts.len() as f64;
        let mut edits = EditQueue::new();
        let mut associations = Vec::new();
        for &part in &parts {
            check_canceled(progress)?;
            let scope = progress.map(|p| p.child(weight));
            let Some(brep) = model.part(part)?.brep() else {
                continue;
            };
            let poly = self
                .compute(brep, params, scope.as_ref())?
                .with_lod(params.granularity);
            if params.save_brep_to_poly_associations {
                associations.push((part, poly_associations(brep, &poly)?));
            }
            edits.add_poly(part, poly);
        }
        check_canceled(progress)?;

        let meshed = edits.apply(model);
        for (part, links) in associations {
            link_associations(model.part_mut(part)?, links)?;
        }
        tracing::info!("{} meshed {} parts", self.name(), meshed);
        Ok(meshed)
    }
}

#[derive(Default)]
struct PartCollector {
    parts: IndexSet<ElementId>,
}

impl ElementVisitor for PartCollector {
    fn visit_part(&mut self, ctx: &VisitContext<'_>, _part: &Part) {
        self.parts.insert(ctx.id);
    }
}

fn poly_associations(
    brep: &BRepRepresentation,
    poly: &PolyRepresentation,
) -> ExchangeResult<Vec<(ShapeId, ShapeType, PolyLink)>> {
    let store = brep.data()?.store();
    let data = poly.get()?;
    Ok(data
        .shapes()
        .filter_map(|(id, _)| {
            let source = data.source_shape(id)?;
            let link = PolyLink {
                representation: poly.id(),
                shape: id,
            };
            Some((source, store.shape_type(source), link))
        })
        .collect())
}

fn link_associations(
    part: &mut Part,
    links: Vec<(ShapeId, ShapeType, PolyLink)>,
) -> ExchangeResult<()> {
    let Some(brep) = part.brep_mut() else {
        return Ok(());
    };
    let data = brep.edit()?;
    for (shape, shape_type, link) in links {
        match shape_type {
            ShapeType::Face => data.link_triangulation(shape, link),
            ShapeType::Edge => data.link_polyline(shape, link),
            other => tracing::debug!("Ignoring association from a {}", other.name()),
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct NullMesher;

impl Mesher for NullMesher {
    fn name(&self) -> &str {
        "null"
    }

    fn compute(
        &self,
        _brep: &BRepRepresentation,
        _params: &MesherParameters,
        _progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<PolyRepresentation> {
        Err(ExchangeError::Unavailable("no mesher".into()))
    }
}

// ============== Simplifier ==============

/// Produces a lighter copy of a model
pub trait Simplifier: Send + Sync {
    fn name(&self) -> &str;

    fn perform(
        &self,
        model: &Model,
        params: &SimplifierParameters,
        progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<Model>;
}

#[derive(Debug, Default)]
pub struct NullSimplifier;

impl Simplifier for NullSimplifier {
    fn name(&self) -> &str {
        "null"
    }

    fn perform(
        &self,
        _model: &Model,
        _params: &SimplifierParameters,
        _progress: Option<&ProgressScope<'_>>,
    ) -> ExchangeResult<Model> {
        Err(ExchangeError::Unavailable("no simplifier".into()))
    }
}

// ============== License ==============

pub trait LicenseManager: Send + Sync {
    fn activate(&self, key: &str) -> ExchangeResult<()>;
}

#[derive(Debug, Default)]
pub struct NullLicenseManager;

impl LicenseManager for NullLicenseManager {
    fn activate(&self, _key: &str) -> ExchangeResult<()> {
        Err(ExchangeError::Unavailable("no license manager".into()))
    }
}

/// Every gated operation fails until [`activate`](Self::activate) succeeds
pub struct LicenseGate {
    manager: Arc<dyn LicenseManager>,
    activated: AtomicBool,
}

impl LicenseGate {
    pub fn new(manager: Arc<dyn LicenseManager>) -> Self {
        Self {
            manager,
            activated: AtomicBool::new(false),
        }
    }

    pub fn activate(&self, key: &str) -> ExchangeResult<()> {
        if self.is_activated() {
            return Ok(());
        }
        self.manager.activate(key)?;
        self.activated.store(true, Ordering::Release);
        tracing::info!("License activated");
        Ok(())
    }

    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::Acquire)
    }

    pub fn check(&self) -> ExchangeResult<()> {
        if self.is_activated() {
            Ok(())
        } else {
            Err(ExchangeError::LicenseNotActivated)
        }
    }
}

impl std::fmt::Debug for LicenseGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseGate")
            .field("activated", &self.is_activated())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::poly::{IndexedTriangleSet, PolyVertexSet};
    use crate::representation::PolyData;
    use mx_cad::{ShapeRef, unique_subshapes};
    use std::sync::atomic::AtomicUsize;

    /// Two triangles per unique face of every body
    #[derive(Default)]
    pub(crate) struct QuadMesher {
        pub calls: AtomicUsize,
    }

    impl Mesher for QuadMesher {
        fn name(&self) -> &str {
            "quad"
        }

        fn compute(
            &self,
            brep: &BRepRepresentation,
            _params: &MesherParameters,
            progress: Option<&ProgressScope<'_>>,
        ) -> ExchangeResult<PolyRepresentation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let data = brep.data()?;
            let mut poly = PolyData::new();
            for body in data.bodies() {
                let faces = unique_subshapes(data.store(), ShapeRef::forward(*body), ShapeType::Face);
                for (i, face) in faces.iter().enumerate() {
                    let mut its = IndexedTriangleSet::new();
                    its.add_coordinates(
                        vec![glam::DVec3::ZERO, glam::DVec3::X, glam::DVec3::ONE, glam::DVec3::Y],
                        &[0, 1, 2, 3],
                        &[4],
                    )?;
                    poly.add_from_source(PolyVertexSet::Triangles(its), *face);
                    if let Some(p) = progress {
                        p.set_fraction((i + 1) as f64 / faces.len() as f64);
                    }
                }
            }
            Ok(PolyRepresentation::new(poly))
        }
    }

    pub(crate) struct KeyLicense(pub &'static str);

    impl LicenseManager for KeyLicense {
        fn activate(&self, key: &str) -> ExchangeResult<()> {
            if key == self.0 {
                Ok(())
            } else {
                Err(ExchangeError::License(format!("invalid key '{key}'")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{KeyLicense, QuadMesher};
    use super::*;
    use crate::fixtures::nut_bolt;
    use crate::progress::ProgressStatus;
    use crate::representation::Lod;

    #[test]
    fn test_license_gate() {
        let gate = LicenseGate::new(Arc::new(KeyLicense("secret")));
        assert!(matches!(gate.check(), Err(ExchangeError::LicenseNotActivated)));
        assert!(matches!(gate.activate("nope"), Err(ExchangeError::License(_))));
        assert!(!gate.is_activated());
        gate.activate("secret").unwrap();
        assert!(gate.check().is_ok());
    }

    #[test]
    fn test_null_backends_are_unavailable() {
        let gate = LicenseGate::new(Arc::new(NullLicenseManager));
        assert!(matches!(gate.activate("any"), Err(ExchangeError::Unavailable(_))));

        let mut reader = NullReader;
        assert!(matches!(
            reader.read(Path::new("a.stp"), &ReaderParameters::default(), None),
            Err(ExchangeError::Unavailable(_))
        ));
        let model = Model::new("empty");
        assert!(matches!(
            NullSimplifier.perform(&model, &SimplifierParameters::default(), None),
            Err(ExchangeError::Unavailable(_))
        ));
    }

    #[test]
    fn test_compute_model_meshes_each_part_once() {
        let mut fixture = nut_bolt();
        let mesher = QuadMesher::default();
        let meshed = mesher
            .compute_model(&mut fixture.model, &MesherParameters::coarse(), None)
            .unwrap();
        assert_eq!(meshed, 2);
        assert_eq!(mesher.calls.load(Ordering::SeqCst), 2);

        let bolt = fixture.model.part(fixture.bolt).unwrap();
        assert_eq!(bolt.polys().len(), 1);
        let poly = bolt.poly_for_lod(Lod::Coarse).unwrap();
        assert_eq!(poly.get().unwrap().number_of_triangles(), 12);
        // no associations unless asked
        let brep = bolt.brep().unwrap().data().unwrap();
        assert!(brep.store().ids().all(|id| brep.triangulation(id).is_none()));
    }

    #[test]
    fn test_compute_model_records_associations() {
        let mut fixture = nut_bolt();
        let mut params = MesherParameters::fine();
        params.save_brep_to_poly_associations = true;
        QuadMesher::default()
            .compute_model(&mut fixture.model, &params, None)
            .unwrap();

        let nut = fixture.model.part(fixture.nut).unwrap();
        let poly = nut.latest_poly().unwrap();
        let data = nut.brep().unwrap().data().unwrap();
        let linked: Vec<_> = data
            .store()
            .ids()
            .filter_map(|id| data.triangulation(id).map(|link| (id, link)))
            .collect();
        assert_eq!(linked.len(), 6);
        for (face, link) in linked {
            assert_eq!(link.representation, poly.id());
            assert_eq!(poly.get().unwrap().source_shape(link.shape), Some(face));
        }
    }

    #[test]
    fn test_compute_model_stops_when_canceled() {
        let mut fixture = nut_bolt();
        let status = ProgressStatus::new();
        status.cancel();
        let root = ProgressScope::root(&status);
        let result =
            QuadMesher::default().compute_model(&mut fixture.model, &MesherParameters::default(), Some(&root));
        assert!(matches!(result, Err(ExchangeError::Canceled)));
        assert!(fixture.model.part(fixture.bolt).unwrap().polys().is_empty());
    }

    #[test]
    fn test_compute_model_rejects_zero_deflection() {
        let mut fixture = nut_bolt();
        let params = MesherParameters {
            angular_deflection: Some(0.0),
            ..MesherParameters::default()
        };
        let mesher = QuadMesher::default();
        let result = mesher.compute_model(&mut fixture.model, &params, None);
        assert!(matches!(result, Err(ExchangeError::Mesh(_))));
        assert_eq!(mesher.calls.load(Ordering::SeqCst), 0);
    }
}
