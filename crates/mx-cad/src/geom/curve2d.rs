//! 2D parametric curves (PCurves) living in a surface's (u, v) space

use std::f64::consts::TAU;
use std::sync::Arc;

use glam::DVec2;

use super::{
    Axis2Placement2d, BSplineCurve, BezierCurve, CurveType, GeomResult, check_range, fmt_head,
    fmt_param,
};
use crate::precision::INFINITE;

#[derive(Debug, Clone, PartialEq)]
pub enum Curve2d {
    Line {
        origin: DVec2,
        direction: DVec2,
    },
    Circle {
        position: Axis2Placement2d,
        radius: f64,
    },
    Ellipse {
        position: Axis2Placement2d,
        major_radius: f64,
        minor_radius: f64,
    },
    Hyperbola {
        position: Axis2Placement2d,
        major_radius: f64,
        minor_radius: f64,
    },
    Parabola {
        position: Axis2Placement2d,
        focal: f64,
    },
    Bezier(BezierCurve<DVec2>),
    BSpline(BSplineCurve<DVec2>),
    Offset {
        basis: Arc<Curve2d>,
        offset: f64,
    },
    Trimmed {
        basis: Arc<Curve2d>,
        first: f64,
        last: f64,
    },
}

impl Curve2d {
    pub fn line(origin: DVec2, direction: DVec2) -> Self {
        Self::Line {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn trimmed(basis: Arc<Curve2d>, first: f64, last: f64) -> GeomResult<Self> {
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

    pub fn describe(&self) -> String {
        let (first, last) = self.domain();
        let head = format!(
            "{}2d [{}, {}]",
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
                "{head} degree {} poles {}",
                bezier.degree(),
                fmt_head(bezier.poles())
            ),
            Self::BSpline(bspline) => format!(
                "{head} degree {} knots {} multiplicities {} poles {}",
                bspline.degree(),
                fmt_head(bspline.knots().knots()),
                fmt_head(bspline.knots().multiplicities()),
                fmt_head(bspline.poles())
            ),
            Self::Offset { basis, offset } => {
                format!("{head} offset {offset} basis ({})", basis.describe())
            }
            Self::Trimmed { basis, .. } => format!("{head} basis ({})", basis.describe()),
        }
    }
}
