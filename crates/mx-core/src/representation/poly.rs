//! Discrete representation of a part

use std::collections::HashMap;
use std::sync::Arc;

use mx_cad::ShapeId;
use serde::{Deserialize, Serialize};

use super::RepresentationId;
use super::lazy::{DataProvider, Lazy};
use crate::appearance::Appearance;
use crate::error::ModelResult;
use crate::poly::PolyVertexSet;
use crate::progress::ProgressScope;

/// Level of detail a poly representation was produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lod {
    Coarse,
    #[default]
    Medium,
    Fine,
}

/// Index of a poly shape inside its representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolyShapeId(u32);

impl PolyShapeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolyShape {
    pub set: PolyVertexSet,
    pub appearance: Option<Arc<Appearance>>,
}

/// Materialized content of a [`PolyRepresentation`]
#[derive(Debug, Clone, Default)]
pub struct PolyData {
    shapes: Vec<PolyShape>,
    sources: HashMap<PolyShapeId, ShapeId>,
}

impl PolyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, set: PolyVertexSet, appearance: Option<Arc<Appearance>>) -> PolyShapeId {
        let id = PolyShapeId(self.shapes.len() as u32);
        self.shapes.push(PolyShape { set, appearance });
        id
    }

    /// Add a poly shape generated from the B-Rep shape `source`
    pub fn add_from_source(&mut self, set: PolyVertexSet, source: ShapeId) -> PolyShapeId {
        let id = self.add(set, None);
        self.sources.insert(id, source);
        id
    }

    pub fn get(&self, id: PolyShapeId) -> Option<&PolyShape> {
        self.shapes.get(id.index())
    }

    pub fn shapes(&self) -> impl Iterator<Item = (PolyShapeId, &PolyShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| (PolyShapeId(i as u32), shape))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// B-Rep shape this poly shape was generated from; absent for authored data
    pub fn source_shape(&self, id: PolyShapeId) -> Option<ShapeId> {
        self.sources.get(&id).copied()
    }

    pub fn number_of_triangles(&self) -> usize {
        self.shapes.iter().map(|s| s.set.number_of_triangles()).sum()
    }
}

/// Discrete representation: point, line and triangle sets
#[derive(Debug, Clone)]
pub struct PolyRepresentation {
    id: RepresentationId,
    lod: Option<Lod>,
    data: Lazy<PolyData>,
}

impl Default for PolyRepresentation {
    fn default() -> Self {
        Self::new(PolyData::default())
    }
}

impl PolyRepresentation {
    pub fn new(data: PolyData) -> Self {
        Self {
            id: RepresentationId::new(),
            lod: None,
            data: Lazy::ready(data),
        }
    }

    pub fn deferred(provider: Arc<dyn DataProvider<PolyData>>) -> Self {
        Self {
            id: RepresentationId::new(),
            lod: None,
            data: Lazy::deferred(provider),
        }
    }

    pub fn with_lod(mut self, lod: Lod) -> Self {
        self.lod = Some(lod);
        self
    }

    pub fn id(&self) -> RepresentationId {
        self.id
    }

    /// Independent copy under a fresh identity
    pub fn duplicate(&self) -> Self {
        Self {
            id: RepresentationId::new(),
            ..self.clone()
        }
    }

    pub fn lod(&self) -> Option<Lod> {
        self.lod
    }

    pub fn get(&self) -> ModelResult<&PolyData> {
        self.data.get(None)
    }

    pub fn get_with_progress(&self, progress: Option<&ProgressScope<'_>>) -> ModelResult<&PolyData> {
        self.data.get(progress)
    }

    /// Mutable access; every call counts as a mutation
    pub fn edit(&mut self) -> ModelResult<&mut PolyData> {
        self.data.get_mut()
    }

    pub fn is_materialized(&self) -> bool {
        self.data.is_materialized()
    }

    pub fn version(&self) -> u64 {
        self.data.version()
    }
}
