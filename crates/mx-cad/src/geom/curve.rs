//! 3D curves

use std::f64::consts::TAU;
use std::sync::Arc;

use glam::DVec3;

use super::{Axis3Placement, BSplineCurve, BezierCurve, GeomResult, check_range, fmt_head, fmt_param};
use crate::precision::INFINITE;

/// Kind tag shared by 3D curves and 2D parametric curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveType {
    Line,
    Circle,
    Ellipse,
    Hyperbola,
    Parabola,
    Bezier,
    BSpline,
    Offset,
    Trimmed,
    Undefined,
}

impl CurveType {
    /// Decodes an external kind code; unknown codes map to `Undefined`
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Line,
            1 => Self::Circle,
            2 => Self::Ellipse,
            3 => Self::Hyperbola,
            4 => Self::Parabola,
            5 => Self::Bezier,
            6 => Self::BSpline,
            7 => Self::Offset,
            8 => Self::Trimmed,
            _ => Self::Undefined,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Circle => "Circle",
            Self::Ellipse => "Ellipse",
            Self::Hyperbola => "Hyperbola",
            Self::Parabola => "Parabola",
            Self::Bezier => "Bezier",
            Self::BSpline => "BSpline",
            Self::Offset => "Offset",
            Self::Trimmed => "Trimmed",
            Self::Undefined => "Undefined",
        }
    }
}

/// Parametric 3D curve
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line {
        origin: DVec3,
        direction: DVec3,
    },
    Circle {
        position: Axis3Placement,
        radius: f64,
    },
    Ellipse {
        position: Axis3Placement,
        major_radius: f64,
        minor_radius: f64,
    },
    Hyperbola {
        position: Axis3Placement,
        major_radius: f64,
        minor_radius: f64,
    },
    Parabola {
        position: Axis3Placement,
        focal: f64,
    },
    Bezier(BezierCurve<DVec3>),
    BSpline(BSplineCurve<DVec3>),
    /// Basis curve offset by `offset` in the plane normal to `direction`
    Offset {
        basis: Arc<Curve>,
        direction: DVec3,
        offset: f64,
    },
    Trimmed {
        basis: Arc<Curve>,
        first: f64,
        last: f64,
    },
}

impl Curve {
    pub fn line(origin: DVec3, direction: DVec3) -> Self {
        Self::Line {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn circle(position: Axis3Placement, radius: f64) -> Self {
        Self::Circle { position, radius }
    }

    pub fn trimmed(basis: Arc<Curve>, first: f64, last: f64) -> GeomResult<Self> {
        check_range(first, last)?;
        Ok(Self::Trimmed { basis, first, last })
    }

    pub fn curve_type(&self) -> CurveType {
        match self {
            Self::Line { .. } => CurveType::Line,
            Self::Circle { .. } => CurveType::Circle,
            Self::Ellipse { .. } => CurveType::Ellipse,
            Self::Hyperbola { .. } => CurveType::Hyperbola,
            Self::Parabola { .. } => CurveType::Parabola,
            Self::Bezier(_) => CurveType::Bezier,
            Self::BSpline(_) => CurveType::BSpline,
            Self::Offset { .. } => CurveType::Offset,
            Self::Trimmed { .. } => CurveType::Trimmed,
        }
    }

    /// Natural parameter range; unbounded ends are `±INFINITE`
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Line { .. } | Self::Hyperbola { .. } | Self::Parabola { .. } => {
                (-INFINITE, INFINITE)
            }
            Self::Circle { .. } | Self::Ellipse { .. } => (0.0, TAU),
            Self::Bezier(bezier) => bezier.domain(),
            Self::BSpline(bspline) => bspline.domain(),
            Self::Offset { basis, .. } => basis.domain(),
            Self::Trimmed { first, last, .. } => (*first, *last),
        }
    }

    /// Point at parameter `t` for analytic curves; `None` for freeform and offset curves
    pub fn value(&self, t: f64) -> Option<DVec3> {
        let conic = |position: &Axis3Placement, x: f64, y: f64| {
            position.location() + position.x_direction() * x + position.y_direction() * y
        };
        match self {
            Self::Line { origin, direction } => Some(*origin + *direction * t),
            Self::Circle { position, radius } => {
                Some(conic(position, radius * t.cos(), radius * t.sin()))
            }
            Self::Ellipse {
                position,
                major_radius,
                minor_radius,
            } => Some(conic(position, major_radius * t.cos(), minor_radius * t.sin())),
            Self::Hyperbola {
                position,
                major_radius,
                minor_radius,
            } => Some(conic(position, major_radius * t.cosh(), minor_radius * t.sinh())),
            Self::Parabola { position, focal } => {
                Some(conic(position, t * t / (4.0 * focal), t))
            }
            Self::Trimmed { basis, .. } => basis.value(t),
            Self::Bezier(_) | Self::BSpline(_) | Self::Offset { .. } => None,
        }
    }

    /// One-line summary of the curve kind, domain and defining data
    pub fn describe(&self) -> String {
        let (first, last) = self.domain();
        let head = format!(
            "{} [{}, {}]",
            self.curve_type().name(),
            fmt_param(first),
            fmt_param(last)
        );
        match self {
            Self::Line { origin, direction } => {
                format!("{head} location {origin:?} direction {direction:?}")
            }
            Self::Circle { position, radius } => {
                format!("{head} center {:?} radius {radius}", position.location())
            }
            Self::Ellipse {
                major_radius,
                minor_radius,
                ..
            }
            | Self::Hyperbola {
                major_radius,
                minor_radius,
                ..
            } => format!("{head} major {major_radius} minor {minor_radius}"),
            Self::Parabola { focal, .. } => format!("{head} focal {focal}"),
            Self::Bezier(bezier) => format!(
                "{head} degree {} poles {} weights {}",
                bezier.degree(),
                fmt_head(bezier.poles()),
                fmt_head(bezier.weights().unwrap_or_default())
            ),
            Self::BSpline(bspline) => format!(
                "{head} degree {} knots {} multiplicities {} poles {} weights {}",
                bspline.degree(),
                fmt_head(bspline.knots().knots()),
                fmt_head(bspline.knots().multiplicities()),
                fmt_head(bspline.poles()),
                fmt_head(bspline.weights().unwrap_or_default())
            ),
            Self::Offset {
                basis,
                direction,
                offset,
            } => format!(
                "{head} direction {direction:?} offset {offset} basis ({})",
                basis.describe()
            ),
            Self::Trimmed { basis, .. } => format!("{head} basis ({})", basis.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_domains() {
        let circle = Curve::circle(Axis3Placement::default(), 2.0);
        assert_eq!(circle.domain(), (0.0, TAU));
        let line = Curve::line(DVec3::ZERO, DVec3::X);
        assert_eq!(line.domain(), (-INFINITE, INFINITE));

        let trimmed = Curve::trimmed(Arc::new(line), -1.0, 3.0).unwrap();
        assert_eq!(trimmed.domain(), (-1.0, 3.0));
        assert_eq!(trimmed.curve_type(), CurveType::Trimmed);
    }

    #[test]
    fn test_offset_delegates_domain() {
        let basis = Arc::new(Curve::circle(Axis3Placement::default(), 1.0));
        let offset = Curve::Offset {
            basis,
            direction: DVec3::Z,
            offset: 0.5,
        };
        assert_eq!(offset.domain(), (0.0, TAU));
    }

    #[test]
    fn test_analytic_values() {
        use approx::assert_relative_eq;

        let line = Curve::line(DVec3::ONE, DVec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(line.value(3.0).unwrap().z, 4.0);

        let circle = Curve::circle(Axis3Placement::at(DVec3::Z), 2.0);
        let quarter = circle.value(TAU / 4.0).unwrap();
        assert_relative_eq!(quarter.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(quarter.y, 2.0);
        assert_relative_eq!(quarter.z, 1.0);

        let trimmed = Curve::trimmed(Arc::new(circle), 0.0, 1.0).unwrap();
        assert_eq!(trimmed.value(0.0), Some(DVec3::new(2.0, 0.0, 1.0)));
    }

    #[test]
    fn test_unknown_code_is_undefined() {
        assert_eq!(CurveType::from_code(6), CurveType::BSpline);
        assert_eq!(CurveType::from_code(42), CurveType::Undefined);
    }

    #[test]
    fn test_describe_lists_at_most_three_poles() {
        let poles = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::ONE];
        let bezier = Curve::Bezier(BezierCurve::new(poles, None).unwrap());
        let text = bezier.describe();
        assert!(text.starts_with("Bezier [0.000000, 1.000000] degree 4"));
        assert!(text.contains(", ...]"));
    }

    #[test]
    fn test_trimmed_rejects_empty_range() {
        let basis = Arc::new(Curve::line(DVec3::ZERO, DVec3::X));
        assert!(Curve::trimmed(basis, 2.0, 1.0).is_err());
    }
}
