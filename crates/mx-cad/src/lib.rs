//! Parametric geometry and B-Rep topology
//!
//! This crate provides:
//! - Placements and affine transformations
//! - Closed sets of 3D curves, 2D parametric curves and surfaces
//! - A shape arena holding bodies, solids, shells, faces, wires, edges and vertices
//! - Enter/leave traversal and identity-keyed exploration of shape trees

pub mod geom;
pub mod precision;
pub mod topology;
pub mod visit;

// Re-exports for convenience
pub use geom::{
    Axis2Placement2d, Axis3Placement, BSplineCurve, BSplineSurface, BezierCurve, BezierSurface,
    Curve, Curve2d, CurveType, GeomError, GeomResult, KnotVector, Surface, SurfaceType,
    Transformation,
};
pub use topology::{
    BodyType, Orientation, PCurve, Shape, ShapeContext, ShapeId, ShapeIter, ShapeRef, ShapeStore,
    ShapeType, ShapeVisitor, SubshapeVisitor, TopologyError, TopologyResult, unique_subshapes,
    visit_subshapes, walk,
};
pub use visit::{Visit, WalkOutcome};
