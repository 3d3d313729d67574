//! Bezier and B-spline pole data shared by curves, 2D curves and surfaces

use glam::DVec3;

use super::{GeomError, GeomResult};

/// Distinct knot values with their multiplicities
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    knots: Vec<f64>,
    multiplicities: Vec<usize>,
}

impl KnotVector {
    pub fn new(knots: Vec<f64>, multiplicities: Vec<usize>) -> GeomResult<Self> {
        if knots.len() != multiplicities.len() {
            return Err(GeomError::InvalidKnots(format!(
                "{} knots but {} multiplicities",
                knots.len(),
                multiplicities.len()
            )));
        }
        if knots.len() < 2 {
            return Err(GeomError::InvalidKnots("at least two knots required".into()));
        }
        if knots.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GeomError::InvalidKnots("knots must be strictly increasing".into()));
        }
        if multiplicities.contains(&0) {
            return Err(GeomError::InvalidKnots("zero multiplicity".into()));
        }
        Ok(Self {
            knots,
            multiplicities,
        })
    }

    /// Uniform clamped knots for `nb_poles` poles of the given degree
    pub fn clamped_uniform(degree: usize, nb_poles: usize) -> GeomResult<Self> {
        if degree == 0 || nb_poles <= degree {
            return Err(GeomError::InvalidPoles(format!(
                "{nb_poles} poles cannot carry degree {degree}"
            )));
        }
        let spans = nb_poles - degree;
        let knots = (0..=spans).map(|i| i as f64 / spans as f64).collect();
        let mut multiplicities = vec![1; spans + 1];
        multiplicities[0] = degree + 1;
        multiplicities[spans] = degree + 1;
        Self::new(knots, multiplicities)
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn multiplicities(&self) -> &[usize] {
        &self.multiplicities
    }

    pub fn first(&self) -> f64 {
        self.knots[0]
    }

    pub fn last(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Knot sequence with every value repeated by its multiplicity
    pub fn flattened(&self) -> Vec<f64> {
        self.knots
            .iter()
            .zip(&self.multiplicities)
            .flat_map(|(&knot, &mult)| std::iter::repeat_n(knot, mult))
            .collect()
    }

    /// Standard clamped B-spline validity for `nb_poles` poles of `degree`
    pub fn check(&self, degree: usize, nb_poles: usize) -> GeomResult<()> {
        let end = degree + 1;
        let last = self.multiplicities.len() - 1;
        if self.multiplicities[0] != end || self.multiplicities[last] != end {
            return Err(GeomError::InvalidKnots(format!(
                "end multiplicities must equal degree + 1 = {end}"
            )));
        }
        if self.multiplicities[1..last].iter().any(|&m| m > degree) {
            return Err(GeomError::InvalidKnots(format!(
                "interior multiplicity exceeds degree {degree}"
            )));
        }
        let total: usize = self.multiplicities.iter().sum();
        if total != nb_poles + degree + 1 {
            return Err(GeomError::InvalidKnots(format!(
                "sum of multiplicities is {total}, expected {}",
                nb_poles + degree + 1
            )));
        }
        Ok(())
    }
}

fn check_weights(weights: Option<&[f64]>, nb_poles: usize) -> GeomResult<()> {
    let Some(weights) = weights else {
        return Ok(());
    };
    if weights.len() != nb_poles {
        return Err(GeomError::InvalidWeights(format!(
            "{} weights for {nb_poles} poles",
            weights.len()
        )));
    }
    if weights.iter().any(|&w| w.is_nan() || w <= 0.0) {
        return Err(GeomError::InvalidWeights("weights must be positive".into()));
    }
    Ok(())
}

/// Bezier curve over poles of type `P` (3D points or 2D parametric points)
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve<P> {
    poles: Vec<P>,
    weights: Option<Vec<f64>>,
}

impl<P> BezierCurve<P> {
    pub fn new(poles: Vec<P>, weights: Option<Vec<f64>>) -> GeomResult<Self> {
        if poles.len() < 2 {
            return Err(GeomError::InvalidPoles("a Bezier curve needs two poles".into()));
        }
        check_weights(weights.as_deref(), poles.len())?;
        Ok(Self { poles, weights })
    }

    pub fn degree(&self) -> usize {
        self.poles.len() - 1
    }

    pub fn poles(&self) -> &[P] {
        &self.poles
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    pub fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Non-uniform rational B-spline curve over poles of type `P`
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineCurve<P> {
    degree: usize,
    poles: Vec<P>,
    weights: Option<Vec<f64>>,
    knots: KnotVector,
}

impl<P> BSplineCurve<P> {
    pub fn new(
        degree: usize,
        poles: Vec<P>,
        weights: Option<Vec<f64>>,
        knots: KnotVector,
    ) -> GeomResult<Self> {
        if degree == 0 || poles.len() <= degree {
            return Err(GeomError::InvalidPoles(format!(
                "{} poles cannot carry degree {degree}",
                poles.len()
            )));
        }
        check_weights(weights.as_deref(), poles.len())?;
        knots.check(degree, poles.len())?;
        Ok(Self {
            degree,
            poles,
            weights,
            knots,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn poles(&self) -> &[P] {
        &self.poles
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots.first(), self.knots.last())
    }
}

/// Bezier patch with a row-major pole grid (`nb_u_poles` rows of `nb_v_poles`)
#[derive(Debug, Clone, PartialEq)]
pub struct BezierSurface {
    poles: Vec<DVec3>,
    nb_u_poles: usize,
    nb_v_poles: usize,
    weights: Option<Vec<f64>>,
}

fn check_grid(poles: &[DVec3], nb_u: usize, nb_v: usize) -> GeomResult<()> {
    if nb_u < 2 || nb_v < 2 {
        return Err(GeomError::InvalidPoles("pole grid needs at least 2x2 poles".into()));
    }
    if poles.len() != nb_u * nb_v {
        return Err(GeomError::InvalidPoles(format!(
            "{} poles do not fill a {nb_u}x{nb_v} grid",
            poles.len()
        )));
    }
    Ok(())
}

impl BezierSurface {
    pub fn new(
        poles: Vec<DVec3>,
        nb_u_poles: usize,
        nb_v_poles: usize,
        weights: Option<Vec<f64>>,
    ) -> GeomResult<Self> {
        check_grid(&poles, nb_u_poles, nb_v_poles)?;
        check_weights(weights.as_deref(), poles.len())?;
        Ok(Self {
            poles,
            nb_u_poles,
            nb_v_poles,
            weights,
        })
    }

    pub fn u_degree(&self) -> usize {
        self.nb_u_poles - 1
    }

    pub fn v_degree(&self) -> usize {
        self.nb_v_poles - 1
    }

    pub fn nb_poles(&self) -> (usize, usize) {
        (self.nb_u_poles, self.nb_v_poles)
    }

    pub fn pole(&self, u: usize, v: usize) -> Option<DVec3> {
        (u < self.nb_u_poles && v < self.nb_v_poles)
            .then(|| self.poles[u * self.nb_v_poles + v])
    }

    pub fn poles(&self) -> &[DVec3] {
        &self.poles
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }
}

/// B-spline patch with a row-major pole grid and one knot vector per direction
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineSurface {
    u_degree: usize,
    v_degree: usize,
    poles: Vec<DVec3>,
    nb_u_poles: usize,
    nb_v_poles: usize,
    weights: Option<Vec<f64>>,
    u_knots: KnotVector,
    v_knots: KnotVector,
}

impl BSplineSurface {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        u_degree: usize,
        v_degree: usize,
        poles: Vec<DVec3>,
        nb_u_poles: usize,
        nb_v_poles: usize,
        weights: Option<Vec<f64>>,
        u_knots: KnotVector,
        v_knots: KnotVector,
    ) -> GeomResult<Self> {
        check_grid(&poles, nb_u_poles, nb_v_poles)?;
        if u_degree == 0 || v_degree == 0 {
            return Err(GeomError::InvalidPoles("degree must be at least 1".into()));
        }
        check_weights(weights.as_deref(), poles.len())?;
        u_knots.check(u_degree, nb_u_poles)?;
        v_knots.check(v_degree, nb_v_poles)?;
        Ok(Self {
            u_degree,
            v_degree,
            poles,
            nb_u_poles,
            nb_v_poles,
            weights,
            u_knots,
            v_knots,
        })
    }

    pub fn u_degree(&self) -> usize {
        self.u_degree
    }

    pub fn v_degree(&self) -> usize {
        self.v_degree
    }

    pub fn nb_poles(&self) -> (usize, usize) {
        (self.nb_u_poles, self.nb_v_poles)
    }

    pub fn pole(&self, u: usize, v: usize) -> Option<DVec3> {
        (u < self.nb_u_poles && v < self.nb_v_poles)
            .then(|| self.poles[u * self.nb_v_poles + v])
    }

    pub fn poles(&self) -> &[DVec3] {
        &self.poles
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn u_knots(&self) -> &KnotVector {
        &self.u_knots
    }

    pub fn v_knots(&self) -> &KnotVector {
        &self.v_knots
    }
}
