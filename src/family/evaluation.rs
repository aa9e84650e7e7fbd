//! Per-element evaluation record
//!
//! Maps each subset of a family to a tri-state result. Known results are
//! cached for the lifetime of the element and are never re-queried.

use crate::common::{Feasibility, PlanningError, PlanningResult, SubsetId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationRecord {
    results: Vec<Feasibility>,
}

impl EvaluationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subset: SubsetId) -> Feasibility {
        self.results
            .get(subset.index())
            .copied()
            .unwrap_or(Feasibility::Unknown)
    }

    /// Record a result; returns `false` if the same result was already cached.
    ///
    /// Rewriting a cached result with the opposite value is an error.
    pub fn set(&mut self, subset: SubsetId, feasible: bool) -> PlanningResult<bool> {
        let value = Feasibility::from_bool(feasible);
        let i = subset.index();
        if i >= self.results.len() {
            self.results.resize(i + 1, Feasibility::Unknown);
        }
        match self.results[i] {
            Feasibility::Unknown => {
                self.results[i] = value;
                Ok(true)
            }
            cached if cached == value => Ok(false),
            cached => Err(PlanningError::InconsistentEvaluation(format!(
                "subset {} already recorded as {:?}, refusing {:?}",
                i, cached, value
            ))),
        }
    }

    /// Iterate over subsets with a known result
    pub fn known(&self) -> impl Iterator<Item = (SubsetId, Feasibility)> + '_ {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_known())
            .map(|(i, &f)| (SubsetId(i), f))
    }

    pub fn is_empty(&self) -> bool {
        self.known().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_by_default() {
        let record = EvaluationRecord::new();
        assert_eq!(record.get(SubsetId(3)), Feasibility::Unknown);
        assert!(record.is_empty());
    }

    #[test]
    fn test_write_once() {
        let mut record = EvaluationRecord::new();
        assert!(record.set(SubsetId(1), true).unwrap());
        assert!(!record.set(SubsetId(1), true).unwrap());
        assert!(matches!(
            record.set(SubsetId(1), false),
            Err(PlanningError::InconsistentEvaluation(_))
        ));
        assert_eq!(record.get(SubsetId(1)), Feasibility::Feasible);
        assert_eq!(record.get(SubsetId(0)), Feasibility::Unknown);
    }

    #[test]
    fn test_known_iterates_recorded_only() {
        let mut record = EvaluationRecord::new();
        record.set(SubsetId(2), false).unwrap();
        let known: Vec<_> = record.known().collect();
        assert_eq!(known, vec![(SubsetId(2), Feasibility::Infeasible)]);
    }
}
