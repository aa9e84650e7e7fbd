//! Halton low-discrepancy sequence
//!
//! One radical-inverse sequence per dimension, each in a distinct prime
//! base. The sequence is fully determined by its index, so two generators
//! created with the same dimension produce identical points.

use crate::common::{PlanningError, PlanningResult};

/// Prime bases, one per supported dimension
const PRIMES: [u32; 32] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53,
    59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131,
];

/// Number of dimensions the prime table supports
pub const MAX_HALTON_DIMENSION: usize = PRIMES.len();

/// Prime base for dimension `index`
pub fn prime(index: usize) -> PlanningResult<u32> {
    PRIMES.get(index).copied().ok_or_else(|| {
        PlanningError::Configuration(format!(
            "no Halton base for dimension index {} (only {} primes available)",
            index, MAX_HALTON_DIMENSION
        ))
    })
}

/// Radical inverse of `index` in `base`, in [0, 1)
pub fn halton(base: u32, index: u64) -> f64 {
    let base_u = base as u64;
    let base_f = base as f64;
    let mut result = 0.0;
    let mut factor = 1.0 / base_f;
    let mut i = index;
    while i > 0 {
        result += factor * (i % base_u) as f64;
        i /= base_u;
        factor /= base_f;
    }
    result
}

/// Multi-dimensional Halton sequence with an explicit index counter
#[derive(Debug, Clone)]
pub struct HaltonSequence {
    bases: Vec<u32>,
    index: u64,
}

impl HaltonSequence {
    pub fn new(dimension: usize) -> PlanningResult<Self> {
        if dimension == 0 {
            return Err(PlanningError::Configuration(
                "Halton sequence needs at least one dimension".to_string(),
            ));
        }
        let bases = (0..dimension).map(prime).collect::<PlanningResult<Vec<_>>>()?;
        Ok(HaltonSequence { bases, index: 0 })
    }

    pub fn dimension(&self) -> usize {
        self.bases.len()
    }

    /// Index of the next point `next_point` will return
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn point(&self, index: u64) -> Vec<f64> {
        self.bases.iter().map(|&b| halton(b, index)).collect()
    }

    pub fn next_point(&mut self) -> Vec<f64> {
        let p = self.point(self.index);
        self.index += 1;
        p
    }
}
