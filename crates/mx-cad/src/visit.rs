//! Traversal control shared by shape and scene-graph walks

/// What a visitor wants the walker to do after an enter callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Descend into the children
    #[default]
    Continue,
    /// Do not descend; the matching leave callback still runs
    SkipChildren,
    /// Stop the whole walk; no further callbacks are made
    Abort,
}

impl Visit {
    /// Maps the boolean enter result used by simple visitors
    pub fn from_descend(descend: bool) -> Self {
        if descend {
            Self::Continue
        } else {
            Self::SkipChildren
        }
    }
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    Aborted,
}

impl WalkOutcome {
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}
