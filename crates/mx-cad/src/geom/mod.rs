//! Parametric geometry
//!
//! Curves and surfaces are immutable values. Composite variants (offset,
//! trimmed, extrusion, revolution) hold their basis behind an `Arc` so the
//! same basis can be shared without copying.

mod curve;
mod curve2d;
mod freeform;
mod placement;
mod surface;

use thiserror::Error;

pub use curve::{Curve, CurveType};
pub use curve2d::Curve2d;
pub use freeform::{BSplineCurve, BSplineSurface, BezierCurve, BezierSurface, KnotVector};
pub use placement::{Axis2Placement2d, Axis3Placement, Transformation};
pub use surface::{Surface, SurfaceType};

/// Error type for geometry construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    #[error("Degenerate axis: {0}")]
    DegenerateAxis(String),

    #[error("Invalid knot vector: {0}")]
    InvalidKnots(String),

    #[error("Invalid poles: {0}")]
    InvalidPoles(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid parameter range [{0}, {1}]")]
    InvalidRange(f64, f64),
}

/// Result type for geometry construction
pub type GeomResult<T> = Result<T, GeomError>;

/// Checks that `first < last`
pub(crate) fn check_range(first: f64, last: f64) -> GeomResult<()> {
    if first.is_nan() || last.is_nan() || first >= last {
        return Err(GeomError::InvalidRange(first, last));
    }
    Ok(())
}

/// Formats a domain end, printing unbounded ends as `-inf`/`inf`
pub(crate) fn fmt_param(value: f64) -> String {
    if crate::precision::is_infinite(value) {
        if value < 0.0 { "-inf".into() } else { "inf".into() }
    } else {
        format!("{value:.6}")
    }
}

/// Formats at most three items of a collection, then `...`
pub(crate) fn fmt_head<T: std::fmt::Debug>(items: &[T]) -> String {
    const SHOWN: usize = 3;
    let mut out = items
        .iter()
        .take(SHOWN)
        .map(|item| format!("{item:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > SHOWN {
        out.push_str(", ...");
    }
    format!("[{out}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_head_truncates() {
        assert_eq!(fmt_head(&[1, 2]), "[1, 2]");
        assert_eq!(fmt_head(&[1, 2, 3, 4, 5]), "[1, 2, 3, ...]");
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(0.0, 1.0).is_ok());
        assert_eq!(check_range(1.0, 1.0), Err(GeomError::InvalidRange(1.0, 1.0)));
        assert!(check_range(f64::NAN, 1.0).is_err());
    }
}
