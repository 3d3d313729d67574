//! B-Rep topology
//!
//! Shapes live in a [`ShapeStore`] arena and are addressed by [`ShapeId`].
//! Sharing a sub-shape means several parents hold the same id, so identity
//! comparisons are id comparisons. A [`ShapeRef`] is one oriented use of a
//! shape inside its parent.

mod explore;
mod store;

use std::fmt;

use thiserror::Error;

use crate::geom::GeomError;

pub use explore::{
    ShapeContext, ShapeIter, ShapeVisitor, SubshapeVisitor, unique_subshapes, visit_subshapes,
    walk,
};
pub use store::{Body, Edge, Face, PCurve, Shape, ShapeStore, Shell, Solid, Vertex, Wire};

/// Stable handle of a shape inside its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) u32);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Orientation of a shape relative to its immediate parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Forward,
    Reversed,
    Undefined,
}

impl Orientation {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Forward,
            1 => Self::Reversed,
            _ => Self::Undefined,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Reversed,
            Self::Reversed => Self::Forward,
            Self::Undefined => Self::Undefined,
        }
    }

    /// Orientation of a child seen through a parent used with `parent`
    pub fn composed(self, parent: Orientation) -> Self {
        match parent {
            Orientation::Reversed => self.reversed(),
            _ => self,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forward => "Forward",
            Self::Reversed => "Reversed",
            Self::Undefined => "Undefined",
        }
    }
}

/// An oriented use of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeRef {
    pub id: ShapeId,
    pub orientation: Orientation,
}

impl ShapeRef {
    pub fn new(id: ShapeId, orientation: Orientation) -> Self {
        Self { id, orientation }
    }

    pub fn forward(id: ShapeId) -> Self {
        Self::new(id, Orientation::Forward)
    }

    pub fn reversed(self) -> Self {
        Self::new(self.id, self.orientation.reversed())
    }

    /// True if both refer to the same shape, whatever their orientations
    pub fn is_same(&self, other: &ShapeRef) -> bool {
        self.id == other.id
    }
}

impl From<ShapeId> for ShapeRef {
    fn from(id: ShapeId) -> Self {
        Self::forward(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    Body,
    Undefined,
}

impl ShapeType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Vertex,
            1 => Self::Edge,
            2 => Self::Wire,
            3 => Self::Face,
            4 => Self::Shell,
            5 => Self::Solid,
            6 => Self::Body,
            _ => Self::Undefined,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "Vertex",
            Self::Edge => "Edge",
            Self::Wire => "Wire",
            Self::Face => "Face",
            Self::Shell => "Shell",
            Self::Solid => "Solid",
            Self::Body => "Body",
            Self::Undefined => "Undefined",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyType {
    #[default]
    Solid,
    Sheet,
    Wireframe,
    /// Point-only body
    Acorn,
    Undefined,
}

impl BodyType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Solid,
            1 => Self::Sheet,
            2 => Self::Wireframe,
            3 => Self::Acorn,
            _ => Self::Undefined,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "Solid",
            Self::Sheet => "Sheet",
            Self::Wireframe => "Wireframe",
            Self::Acorn => "Acorn",
            Self::Undefined => "Undefined",
        }
    }
}

/// Error type for topology construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("Unknown shape {0}")]
    UnknownShape(ShapeId),

    #[error("A {child:?} cannot be a child of a {parent:?}")]
    InvalidChild { parent: ShapeType, child: ShapeType },

    #[error("Face {0} already has an outer wire")]
    OuterWireExists(ShapeId),

    #[error("Edge {0} already has two vertices")]
    TooManyVertices(ShapeId),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeomError),
}

/// Result type for topology construction
pub type TopologyResult<T> = Result<T, TopologyError>;
