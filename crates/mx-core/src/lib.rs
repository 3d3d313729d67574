//! CAD document model
//!
//! This crate provides:
//! - A scene graph of parts, assemblies and instances stored in a [`Model`]
//! - Lazily materialized B-Rep and poly representations
//! - Appearances, property tables, PMI and layers
//! - Scene-graph traversal with pruning, transform composition and deferred edits
//! - Hierarchical progress reporting with cancellation
//! - Collaborator traits for readers, writers, meshers and simplifiers
//! - Exploration passes producing text reports

pub mod appearance;
pub mod config;
pub mod error;
pub mod exchange;
pub mod explore;
pub mod layer;
pub mod model;
pub mod pmi;
pub mod poly;
pub mod progress;
pub mod property;
pub mod representation;
pub mod scene;
pub mod traverse;

#[cfg(test)]
mod fixtures;

// Re-exports for convenience
pub use appearance::{Appearance, AppearanceId, Color, Material};
pub use config::{ConfigError, ExchangeConfig};
pub use error::{ModelError, ModelResult};
pub use exchange::{
    ExchangeError, ExchangeResult, LicenseGate, LicenseManager, Mesher, MesherParameters,
    ModelReader, ModelWriter, ReaderParameters, Simplifier, SimplifierParameters,
    WriterParameters,
};
pub use layer::{Layer, LayerItemVisitor, LayerShape};
pub use model::Model;
pub use pmi::{PmiData, PmiTable};
pub use poly::{IndexedTriangleSet, PolyLineSet, PolyPointSet, PolyVertexSet};
pub use progress::{ObserverGuard, ProgressObserver, ProgressScope, ProgressStatus};
pub use property::{PropertyTable, PropertyValue, PropertyVisitor};
pub use representation::{
    BRepData, BRepRepresentation, DataProvider, Lod, PolyData, PolyLink, PolyRepresentation,
    PolyShapeId, RepresentationId,
};
pub use scene::{Assembly, ElementId, ElementType, Instance, Part, SceneNode};
pub use traverse::{EditQueue, ElementVisitor, TransformStack, VisitContext};
