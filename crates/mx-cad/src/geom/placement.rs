//! Coordinate frames and affine transformations

use glam::{DAffine3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::{GeomError, GeomResult};
use crate::precision::CONFUSION;

/// Right-handed local frame: origin, main axis and reference x direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis3Placement {
    location: DVec3,
    axis: DVec3,
    x_direction: DVec3,
}

impl Default for Axis3Placement {
    fn default() -> Self {
        Self {
            location: DVec3::ZERO,
            axis: DVec3::Z,
            x_direction: DVec3::X,
        }
    }
}

impl Axis3Placement {
    /// Create a placement, orthonormalizing `x_direction` against `axis`
    pub fn new(location: DVec3, axis: DVec3, x_direction: DVec3) -> GeomResult<Self> {
        let axis = axis
            .try_normalize()
            .ok_or_else(|| GeomError::DegenerateAxis("zero main axis".into()))?;
        let projected = x_direction - axis * x_direction.dot(axis);
        if projected.length() < CONFUSION {
            return Err(GeomError::DegenerateAxis(
                "x direction is parallel to the main axis".into(),
            ));
        }
        Ok(Self {
            location,
            axis,
            x_direction: projected.normalize(),
        })
    }

    /// Standard frame moved to `location`
    pub fn at(location: DVec3) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn location(&self) -> DVec3 {
        self.location
    }

    pub fn axis(&self) -> DVec3 {
        self.axis
    }

    pub fn x_direction(&self) -> DVec3 {
        self.x_direction
    }

    pub fn y_direction(&self) -> DVec3 {
        self.axis.cross(self.x_direction)
    }
}

/// Local frame of a 2D parametric curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis2Placement2d {
    location: DVec2,
    x_direction: DVec2,
}

impl Default for Axis2Placement2d {
    fn default() -> Self {
        Self {
            location: DVec2::ZERO,
            x_direction: DVec2::X,
        }
    }
}

impl Axis2Placement2d {
    pub fn new(location: DVec2, x_direction: DVec2) -> GeomResult<Self> {
        let x_direction = x_direction
            .try_normalize()
            .ok_or_else(|| GeomError::DegenerateAxis("zero x direction".into()))?;
        Ok(Self {
            location,
            x_direction,
        })
    }

    pub fn at(location: DVec2) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn location(&self) -> DVec2 {
        self.location
    }

    pub fn x_direction(&self) -> DVec2 {
        self.x_direction
    }

    pub fn y_direction(&self) -> DVec2 {
        self.x_direction.perp()
    }
}

/// Rigid or affine placement of an instance relative to its parent
///
/// Composition follows the column-vector convention: `a.multiplied(&b)`
/// applies `b` first and `a` second, so a chain `root.multiplied(&child)`
/// maps child coordinates into the root frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    affine: DAffine3,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<DAffine3> for Transformation {
    fn from(affine: DAffine3) -> Self {
        Self { affine }
    }
}

impl Transformation {
    pub fn identity() -> Self {
        Self {
            affine: DAffine3::IDENTITY,
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            affine: DAffine3::from_translation(translation),
        }
    }

    /// Rotation by `angle` radians around `axis` through the origin
    pub fn from_rotation(axis: DVec3, angle: f64) -> GeomResult<Self> {
        let axis = axis
            .try_normalize()
            .ok_or_else(|| GeomError::DegenerateAxis("zero rotation axis".into()))?;
        Ok(Self {
            affine: DAffine3::from_axis_angle(axis, angle),
        })
    }

    /// Maps the standard frame onto `placement`
    pub fn from_placement(placement: &Axis3Placement) -> Self {
        Self {
            affine: DAffine3::from_cols(
                placement.x_direction(),
                placement.y_direction(),
                placement.axis(),
                placement.location(),
            ),
        }
    }

    pub fn as_affine(&self) -> DAffine3 {
        self.affine
    }

    /// Returns `self ∘ other`
    pub fn multiplied(&self, other: &Transformation) -> Self {
        Self {
            affine: self.affine * other.affine,
        }
    }

    pub fn inverted(&self) -> Self {
        Self {
            affine: self.affine.inverse(),
        }
    }

    /// Rows of the linear part
    pub fn rotation_part(&self) -> [[f64; 3]; 3] {
        let m = self.affine.matrix3;
        [
            m.row(0).to_array(),
            m.row(1).to_array(),
            m.row(2).to_array(),
        ]
    }

    pub fn translation_part(&self) -> DVec3 {
        self.affine.translation
    }

    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.affine.transform_point3(point)
    }

    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.affine.transform_vector3(vector)
    }

    pub fn abs_diff_eq(&self, other: &Transformation, tolerance: f64) -> bool {
        self.affine.abs_diff_eq(other.affine, tolerance)
    }

    pub fn is_identity(&self) -> bool {
        self.abs_diff_eq(&Self::identity(), CONFUSION)
    }
}
