//! Exact boundary representation of a part

use std::collections::HashMap;
use std::sync::Arc;

use mx_cad::{ShapeId, ShapeRef, ShapeStore, ShapeType};

use super::lazy::{DataProvider, Lazy};
use super::{PolyLink, RepresentationId};
use crate::appearance::Appearance;
use crate::error::ModelResult;
use crate::progress::ProgressScope;
use crate::property::PropertyTable;

/// Materialized content of a [`BRepRepresentation`]
#[derive(Debug, Clone, Default)]
pub struct BRepData {
    store: ShapeStore,
    bodies: Vec<ShapeId>,
    appearances: HashMap<ShapeId, Arc<Appearance>>,
    properties: HashMap<ShapeId, PropertyTable>,
    triangulations: HashMap<ShapeId, PolyLink>,
    polylines: HashMap<ShapeId, PolyLink>,
}

impl BRepData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ShapeStore {
        &mut self.store
    }

    pub fn bodies(&self) -> &[ShapeId] {
        &self.bodies
    }

    pub fn body_refs(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.bodies.iter().map(|&id| ShapeRef::forward(id))
    }

    pub fn add_body(&mut self, body: ShapeId) -> ModelResult<()> {
        match self.store.shape_type(body) {
            ShapeType::Body => {
                self.bodies.push(body);
                Ok(())
            }
            ShapeType::Undefined => Err(mx_cad::TopologyError::UnknownShape(body).into()),
            other => Err(mx_cad::TopologyError::InvalidChild {
                parent: ShapeType::Body,
                child: other,
            }
            .into()),
        }
    }

    /// Returns false if `body` was not listed
    pub fn remove_body(&mut self, body: ShapeId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|&b| b != body);
        before != self.bodies.len()
    }

    pub fn appearance(&self, shape: ShapeId) -> Option<&Arc<Appearance>> {
        self.appearances.get(&shape)
    }

    pub fn set_appearance(&mut self, shape: ShapeId, appearance: Arc<Appearance>) {
        self.appearances.insert(shape, appearance);
    }

    /// Every (shape, appearance) pair, in no particular order
    pub fn appearances(&self) -> impl Iterator<Item = (ShapeId, &Arc<Appearance>)> {
        self.appearances.iter().map(|(&id, a)| (id, a))
    }

    pub fn properties(&self, shape: ShapeId) -> Option<&PropertyTable> {
        self.properties.get(&shape)
    }

    pub fn properties_mut(&mut self, shape: ShapeId) -> &mut PropertyTable {
        self.properties.entry(shape).or_default()
    }

    /// Poly shape generated for `face`, if the mesher recorded one
    pub fn triangulation(&self, face: ShapeId) -> Option<PolyLink> {
        self.triangulations.get(&face).copied()
    }

    /// Poly shape generated for `edge`, if the mesher recorded one
    pub fn polyline(&self, edge: ShapeId) -> Option<PolyLink> {
        self.polylines.get(&edge).copied()
    }

    pub fn link_triangulation(&mut self, face: ShapeId, link: PolyLink) {
        self.triangulations.insert(face, link);
    }

    pub fn link_polyline(&mut self, edge: ShapeId, link: PolyLink) {
        self.polylines.insert(edge, link);
    }

    /// Point links aimed at poly representation `from` to `to` instead
    pub fn retarget_links(&mut self, from: RepresentationId, to: RepresentationId) {
        for link in self
            .triangulations
            .values_mut()
            .chain(self.polylines.values_mut())
        {
            if link.representation == from {
                link.representation = to;
            }
        }
    }
}

/// Exact representation: one or more bodies, materialized on first access
#[derive(Debug, Clone)]
pub struct BRepRepresentation {
    id: RepresentationId,
    data: Lazy<BRepData>,
}

impl Default for BRepRepresentation {
    fn default() -> Self {
        Self::new(BRepData::default())
    }
}

impl BRepRepresentation {
    pub fn new(data: BRepData) -> Self {
        Self {
            id: RepresentationId::new(),
            data: Lazy::ready(data),
        }
    }

    /// Representation whose bodies are produced by `provider` on first access
    pub fn deferred(provider: Arc<dyn DataProvider<BRepData>>) -> Self {
        Self {
            id: RepresentationId::new(),
            data: Lazy::deferred(provider),
        }
    }

    pub fn id(&self) -> RepresentationId {
        self.id
    }

    /// Independent copy under a fresh identity
    ///
    /// A plain `clone` keeps the identity and stands for the same
    /// representation.
    pub fn duplicate(&self) -> Self {
        Self {
            id: RepresentationId::new(),
            data: self.data.clone(),
        }
    }

    /// Retarget poly links of materialized data; unmaterialized data has none
    pub(crate) fn retarget_links(&mut self, from: RepresentationId, to: RepresentationId) {
        if let Some(data) = self.data.materialized_mut() {
            data.retarget_links(from, to);
        }
    }

    /// Bodies, materializing them on first call
    pub fn get(&self) -> ModelResult<&[ShapeId]> {
        self.get_with_progress(None)
    }

    pub fn get_with_progress(&self, progress: Option<&ProgressScope<'_>>) -> ModelResult<&[ShapeId]> {
        Ok(self.data.get(progress)?.bodies())
    }

    pub fn data(&self) -> ModelResult<&BRepData> {
        self.data.get(None)
    }

    /// Mutable access; every call counts as a mutation
    pub fn edit(&mut self) -> ModelResult<&mut BRepData> {
        self.data.get_mut()
    }

    pub fn add_body(&mut self, body: ShapeId) -> ModelResult<()> {
        self.edit()?.add_body(body)
    }

    pub fn remove_body(&mut self, body: ShapeId) -> ModelResult<()> {
        if self.edit()?.remove_body(body) {
            Ok(())
        } else {
            Err(mx_cad::TopologyError::UnknownShape(body).into())
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.data.is_materialized()
    }

    /// Number of mutations since creation
    pub fn version(&self) -> u64 {
        self.data.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::progress::ProgressStatus;
    use glam::DVec3;
    use mx_cad::BodyType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl DataProvider<BRepData> for CountingProvider {
        fn provide(&self, progress: Option<&ProgressScope<'_>>) -> ModelResult<BRepData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if progress.is_some_and(|p| p.was_canceled()) {
                return Err(ModelError::Canceled);
            }
            let mut data = BRepData::new();
            for x in [0.0, 1.0] {
                let vertex = data.store_mut().add_vertex(DVec3::new(x, 0.0, 0.0), 1e-7);
                let body = data
                    .store_mut()
                    .add_body(BodyType::Acorn, [ShapeRef::forward(vertex)])?;
                data.add_body(body)?;
            }
            Ok(data)
        }
    }

    fn counting() -> (Arc<CountingProvider>, BRepRepresentation) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let rep = BRepRepresentation::deferred(provider.clone());
        (provider, rep)
    }

    #[test]
    fn test_get_is_idempotent() {
        let (provider, rep) = counting();
        assert!(!rep.is_materialized());

        let first = rep.get().unwrap();
        let second = rep.get().unwrap();
        assert_eq!(first, second);
        assert!(std::ptr::eq(first.as_ptr(), second.as_ptr()));
        assert_eq!(first.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(rep.version(), 0);
    }

    #[test]
    fn test_canceled_materialization_stays_unmaterialized() {
        let (provider, rep) = counting();
        let status = ProgressStatus::new();
        status.cancel();
        {
            let scope = ProgressScope::root(&status);
            let result = rep.get_with_progress(Some(&scope));
            assert!(matches!(result, Err(ModelError::Canceled)));
        }
        assert!(!rep.is_materialized());

        assert_eq!(rep.get().unwrap().len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mutation_bumps_version() {
        let (_, mut rep) = counting();
        let bodies = rep.get().unwrap().to_vec();
        rep.remove_body(bodies[0]).unwrap();
        assert_eq!(rep.version(), 1);
        assert_eq!(rep.get().unwrap(), &bodies[1..]);
        assert!(rep.remove_body(bodies[0]).is_err());
    }

    #[test]
    fn test_add_body_checks_kind() {
        let mut rep = BRepRepresentation::default();
        let vertex = rep.edit().unwrap().store_mut().add_vertex(DVec3::ZERO, 1e-7);
        assert!(matches!(rep.add_body(vertex), Err(ModelError::Topology(_))));
    }
}
