//! Sampling domains for roadmap construction

use nalgebra::DVector;

use crate::common::{PlanningError, PlanningResult, State};

/// Per-dimension lower and upper bounds of a real vector space
#[derive(Debug, Clone, PartialEq)]
pub struct RealVectorBounds {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl RealVectorBounds {
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Self {
        RealVectorBounds { low, high }
    }

    /// Same `[low, high]` interval in every dimension
    pub fn uniform(dimension: usize, low: f64, high: f64) -> Self {
        RealVectorBounds {
            low: vec![low; dimension],
            high: vec![high; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.low.len()
    }

    pub fn extent(&self, k: usize) -> f64 {
        self.high[k] - self.low[k]
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dimension()
            && point
                .iter()
                .enumerate()
                .all(|(k, &x)| x >= self.low[k] && x <= self.high[k])
    }

    /// Bounds must be finite and non-degenerate in every dimension
    pub fn validate(&self) -> PlanningResult<()> {
        if self.low.len() != self.high.len() {
            return Err(PlanningError::PreconditionViolation(format!(
                "bounds have {} lower and {} upper values",
                self.low.len(),
                self.high.len()
            )));
        }
        for (k, (&l, &h)) in self.low.iter().zip(self.high.iter()).enumerate() {
            if !l.is_finite() || !h.is_finite() || !(l < h) {
                return Err(PlanningError::PreconditionViolation(format!(
                    "dimension {} is not bounded: [{}, {}]",
                    k, l, h
                )));
            }
        }
        Ok(())
    }
}

/// Configuration space a roadmap samples from
pub trait Domain {
    fn dimension(&self) -> usize;

    /// Bounds when the domain is a bounded real vector space, `None` otherwise
    fn bounds(&self) -> Option<&RealVectorBounds>;

    /// Turn sampled coordinates into a vertex state
    fn materialize(&self, coords: Vec<f64>) -> State {
        DVector::from_vec(coords)
    }
}

/// Axis-aligned box in R^n
#[derive(Debug, Clone, PartialEq)]
pub struct RealVectorSpace {
    bounds: RealVectorBounds,
}

impl RealVectorSpace {
    pub fn new(bounds: RealVectorBounds) -> PlanningResult<Self> {
        bounds.validate()?;
        if bounds.dimension() == 0 {
            return Err(PlanningError::PreconditionViolation(
                "real vector space needs at least one dimension".to_string(),
            ));
        }
        Ok(RealVectorSpace { bounds })
    }
}

impl Domain for RealVectorSpace {
    fn dimension(&self) -> usize {
        self.bounds.dimension()
    }

    fn bounds(&self) -> Option<&RealVectorBounds> {
        Some(&self.bounds)
    }
}
