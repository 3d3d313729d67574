//! Surfaces

use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use glam::DVec3;

use super::{Axis3Placement, BSplineSurface, BezierSurface, Curve, GeomResult, check_range, fmt_head, fmt_param};
use crate::precision::INFINITE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    LinearExtrusion,
    Revolution,
    Bezier,
    BSpline,
    Offset,
    Trimmed,
    Undefined,
}

impl SurfaceType {
    /// Decodes an external kind code; unknown codes map to `Undefined`
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Plane,
            1 => Self::Cylinder,
            2 => Self::Cone,
            3 => Self::Sphere,
            4 => Self::Torus,
            5 => Self::LinearExtrusion,
            6 => Self::Revolution,
            7 => Self::Bezier,
            8 => Self::BSpline,
            9 => Self::Offset,
            10 => Self::Trimmed,
            _ => Self::Undefined,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plane => "Plane",
            Self::Cylinder => "Cylinder",
            Self::Cone => "Cone",
            Self::Sphere => "Sphere",
            Self::Torus => "Torus",
            Self::LinearExtrusion => "LinearExtrusion",
            Self::Revolution => "Revolution",
            Self::Bezier => "Bezier",
            Self::BSpline => "BSpline",
            Self::Offset => "Offset",
            Self::Trimmed => "Trimmed",
            Self::Undefined => "Undefined",
        }
    }
}

/// Parametric surface
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    Plane {
        position: Axis3Placement,
    },
    Cylinder {
        position: Axis3Placement,
        radius: f64,
    },
    Cone {
        position: Axis3Placement,
        radius: f64,
        semi_angle: f64,
    },
    Sphere {
        position: Axis3Placement,
        radius: f64,
    },
    Torus {
        position: Axis3Placement,
        major_radius: f64,
        minor_radius: f64,
    },
    /// Basis curve swept along `direction`
    LinearExtrusion {
        basis: Arc<Curve>,
        direction: DVec3,
    },
    /// Basis curve revolved around the axis through `location` along `direction`
    Revolution {
        basis: Arc<Curve>,
        location: DVec3,
        direction: DVec3,
    },
    Bezier(BezierSurface),
    BSpline(BSplineSurface),
    Offset {
        basis: Arc<Surface>,
        offset: f64,
    },
    Trimmed {
        basis: Arc<Surface>,
        u_range: (f64, f64),
        v_range: (f64, f64),
    },
}

impl Surface {
    pub fn plane(position: Axis3Placement) -> Self {
        Self::Plane { position }
    }

    pub fn trimmed(
        basis: Arc<Surface>,
        u_range: (f64, f64),
        v_range: (f64, f64),
    ) -> GeomResult<Self> {
        check_range(u_range.0, u_range.1)?;
        check_range(v_range.0, v_range.1)?;
        Ok(Self::Trimmed {
            basis,
            u_range,
            v_range,
        })
    }

    pub fn surface_type(&self) -> SurfaceType {
        match self {
            Self::Plane { .. } => SurfaceType::Plane,
            Self::Cylinder { .. } => SurfaceType::Cylinder,
            Self::Cone { .. } => SurfaceType::Cone,
            Self::Sphere { .. } => SurfaceType::Sphere,
            Self::Torus { .. } => SurfaceType::Torus,
            Self::LinearExtrusion { .. } => SurfaceType::LinearExtrusion,
            Self::Revolution { .. } => SurfaceType::Revolution,
            Self::Bezier(_) => SurfaceType::Bezier,
            Self::BSpline(_) => SurfaceType::BSpline,
            Self::Offset { .. } => SurfaceType::Offset,
            Self::Trimmed { .. } => SurfaceType::Trimmed,
        }
    }

    pub fn u_domain(&self) -> (f64, f64) {
        match self {
            Self::Plane { .. } => (-INFINITE, INFINITE),
            Self::Cylinder { .. }
            | Self::Cone { .. }
            | Self::Sphere { .. }
            | Self::Torus { .. }
            | Self::Revolution { .. } => (0.0, TAU),
            Self::LinearExtrusion { basis, .. } => basis.domain(),
            Self::Bezier(_) => (0.0, 1.0),
            Self::BSpline(bspline) => (bspline.u_knots().first(), bspline.u_knots().last()),
            Self::Offset { basis, .. } => basis.u_domain(),
            Self::Trimmed { u_range, .. } => *u_range,
        }
    }

    pub fn v_domain(&self) -> (f64, f64) {
        match self {
            Self::Plane { .. }
            | Self::Cylinder { .. }
            | Self::Cone { .. }
            | Self::LinearExtrusion { .. } => (-INFINITE, INFINITE),
            Self::Sphere { .. } => (-FRAC_PI_2, FRAC_PI_2),
            Self::Torus { .. } => (0.0, TAU),
            Self::Revolution { basis, .. } => basis.domain(),
            Self::Bezier(_) => (0.0, 1.0),
            Self::BSpline(bspline) => (bspline.v_knots().first(), bspline.v_knots().last()),
            Self::Offset { basis, .. } => basis.v_domain(),
            Self::Trimmed { v_range, .. } => *v_range,
        }
    }

    pub fn describe(&self) -> String {
        let (u_min, u_max) = self.u_domain();
        let (v_min, v_max) = self.v_domain();
        let head = format!(
            "{} u [{}, {}] v [{}, {}]",
            self.surface_type().name(),
            fmt_param(u_min),
            fmt_param(u_max),
            fmt_param(v_min),
            fmt_param(v_max)
        );
        match self {
            Self::Plane { position } => format!(
                "{head} location {:?} normal {:?}",
                position.location(),
                position.axis()
            ),
            Self::Cylinder { radius, .. } | Self::Sphere { radius, .. } => {
                format!("{head} radius {radius}")
            }
            Self::Cone {
                radius, semi_angle, ..
            } => format!("{head} radius {radius} semi-angle {semi_angle}"),
            Self::Torus {
                major_radius,
                minor_radius,
                ..
            } => format!("{head} major {major_radius} minor {minor_radius}"),
            Self::LinearExtrusion { basis, direction } => format!(
                "{head} direction {direction:?} basis ({})",
                basis.describe()
            ),
            Self::Revolution {
                basis,
                location,
                direction,
            } => format!(
                "{head} location {location:?} direction {direction:?} basis ({})",
                basis.describe()
            ),
            Self::Bezier(bezier) => format!(
                "{head} degree {}x{} poles {}",
                bezier.u_degree(),
                bezier.v_degree(),
                fmt_head(bezier.poles())
            ),
            Self::BSpline(bspline) => format!(
                "{head} degree {}x{} u knots {} v knots {} poles {}",
                bspline.u_degree(),
                bspline.v_degree(),
                fmt_head(bspline.u_knots().knots()),
                fmt_head(bspline.v_knots().knots()),
                fmt_head(bspline.poles())
            ),
            Self::Offset { basis, offset } => {
                format!("{head} offset {offset} basis ({})", basis.describe())
            }
            Self::Trimmed { basis, .. } => format!("{head} basis ({})", basis.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::KnotVector;

    #[test]
    fn test_elementary_domains() {
        let sphere = Surface::Sphere {
            position: Axis3Placement::default(),
            radius: 1.0,
        };
        assert_eq!(sphere.u_domain(), (0.0, TAU));
        assert_eq!(sphere.v_domain(), (-FRAC_PI_2, FRAC_PI_2));

        let plane = Surface::plane(Axis3Placement::default());
        assert_eq!(plane.v_domain(), (-INFINITE, INFINITE));
    }

    #[test]
    fn test_swept_domains_follow_basis() {
        let basis = Arc::new(
            Curve::trimmed(Arc::new(Curve::line(DVec3::ZERO, DVec3::X)), 0.0, 4.0).unwrap(),
        );
        let extrusion = Surface::LinearExtrusion {
            basis: basis.clone(),
            direction: DVec3::Z,
        };
        assert_eq!(extrusion.u_domain(), (0.0, 4.0));

        let revolution = Surface::Revolution {
            basis,
            location: DVec3::ZERO,
            direction: DVec3::Z,
        };
        assert_eq!(revolution.v_domain(), (0.0, 4.0));
        assert_eq!(revolution.surface_type(), SurfaceType::Revolution);
    }

    #[test]
    fn test_bspline_surface_domain_from_knots() {
        let poles = (0..9).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect();
        let knots = KnotVector::new(vec![0.0, 2.0], vec![3, 3]).unwrap();
        let surface = Surface::BSpline(
            BSplineSurface::new(2, 2, poles, 3, 3, None, knots.clone(), knots).unwrap(),
        );
        assert_eq!(surface.u_domain(), (0.0, 2.0));
        assert!(surface.describe().starts_with("BSpline u [0.000000, 2.000000]"));
    }

    #[test]
    fn test_trimmed_surface_rejects_bad_rectangle() {
        let basis = Arc::new(Surface::plane(Axis3Placement::default()));
        assert!(Surface::trimmed(basis, (0.0, 1.0), (1.0, 0.0)).is_err());
    }
}
