//! Error types for the document model

use mx_cad::{GeomError, TopologyError};
use thiserror::Error;

use crate::scene::ElementId;

/// Error type for model construction, editing and materialization
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Unknown element {0}")]
    UnknownElement(ElementId),

    #[error("Element {0} is not a part")]
    NotAPart(ElementId),

    #[error("Element {0} is not an assembly")]
    NotAnAssembly(ElementId),

    #[error("Element {0} is not an instance")]
    NotAnInstance(ElementId),

    #[error("Instance target {0} must be a part or an assembly")]
    InvalidInstanceTarget(ElementId),

    #[error("Instancing {target} under {assembly} would create a cycle")]
    WouldCreateCycle {
        assembly: ElementId,
        target: ElementId,
    },

    #[error("Instance {instance} is not a child of {assembly}")]
    NotAChild {
        assembly: ElementId,
        instance: ElementId,
    },

    #[error("Representation provider failed: {0}")]
    Provider(String),

    #[error("Materialization was canceled")]
    Canceled,

    #[error("Invalid poly data: {0}")]
    InvalidPolyData(String),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeomError),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
