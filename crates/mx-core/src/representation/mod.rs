//! Representations attached to parts
//!
//! A part owns at most one exact [`BRepRepresentation`] and any number of
//! [`PolyRepresentation`]s (levels of detail). Both materialize their data
//! lazily through a [`DataProvider`] and keep it until mutated.

mod brep;
mod lazy;
mod poly;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use brep::{BRepData, BRepRepresentation};
pub use lazy::DataProvider;
pub use poly::{Lod, PolyData, PolyRepresentation, PolyShape, PolyShapeId};

/// Identity of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepresentationId(Uuid);

impl RepresentationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RepresentationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RepresentationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference from a B-Rep shape to the poly shape generated for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolyLink {
    pub representation: RepresentationId,
    pub shape: PolyShapeId,
}

/// Either kind of representation, borrowed
#[derive(Debug, Clone, Copy)]
pub enum Representation<'a> {
    BRep(&'a BRepRepresentation),
    Poly(&'a PolyRepresentation),
}

impl Representation<'_> {
    pub fn id(&self) -> RepresentationId {
        match self {
            Self::BRep(rep) => rep.id(),
            Self::Poly(rep) => rep.id(),
        }
    }
}

/// Callbacks for the representations of a part
pub trait RepresentationVisitor {
    fn visit_brep(&mut self, _rep: &BRepRepresentation) {}
    fn visit_poly(&mut self, _rep: &PolyRepresentation) {}
}
