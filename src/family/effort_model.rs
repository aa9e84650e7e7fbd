//! Effort model over a family of subsets
//!
//! Given the results already cached for one graph element, decides
//! whether the target subset's feasibility is determined, estimates the
//! probability that it is feasible, and picks the subset whose
//! evaluation is cheapest per unit chance of resolving the target.
//!
//! Feasibility under different unevaluated subsets is treated as
//! independent. This is an approximation: subsets related by inclusion
//! are correlated in reality, and no joint model is attempted.

use ordered_float::OrderedFloat;

use crate::common::{Feasibility, PlanningResult, SubsetId};
use crate::family::{EvaluationRecord, Family};

/// Outcome of `EffortModel::select_next_subset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The target's feasibility already follows from cached results
    Resolved(Feasibility),
    /// Evaluate this subset next
    Evaluate(SubsetId),
}

#[derive(Debug, Clone)]
struct Candidate {
    subset: SubsetId,
    cost: f64,
    /// Probability that evaluating this subset resolves the target
    gain: f64,
}

#[derive(Debug, Clone)]
pub struct EffortModel {
    family: Family,
    target: SubsetId,
    implying: Vec<SubsetId>,
    implied: Vec<SubsetId>,
}

impl EffortModel {
    pub fn new(family: Family, target: &str) -> PlanningResult<Self> {
        let target = family.subset_id(target)?;
        let mut model = EffortModel {
            family,
            target,
            implying: Vec::new(),
            implied: Vec::new(),
        };
        model.refresh_relations();
        Ok(model)
    }

    pub fn set_target(&mut self, name: &str) -> PlanningResult<()> {
        self.target = self.family.subset_id(name)?;
        self.refresh_relations();
        tracing::debug!(
            target_subset = name,
            implying = self.implying.len(),
            implied = self.implied.len(),
            "effort model target set"
        );
        Ok(())
    }

    pub fn target(&self) -> SubsetId {
        self.target
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    fn refresh_relations(&mut self) {
        self.implying = self.family.implying(self.target);
        self.implied = self.family.implied_by(self.target);
    }

    /// Target feasibility implied by the cached results, without evaluating anything
    pub fn resolve(&self, record: &EvaluationRecord) -> Feasibility {
        match record.get(self.target) {
            Feasibility::Unknown => {}
            known => return known,
        }
        if self
            .implying
            .iter()
            .any(|&s| record.get(s) == Feasibility::Feasible)
        {
            return Feasibility::Feasible;
        }
        if self
            .implied
            .iter()
            .any(|&s| record.get(s) == Feasibility::Infeasible)
        {
            return Feasibility::Infeasible;
        }
        Feasibility::Unknown
    }

    /// Estimated probability that the target evaluates feasible
    pub fn p_hat(&self, record: &EvaluationRecord) -> f64 {
        match self.resolve(record) {
            Feasibility::Feasible => return 1.0,
            Feasibility::Infeasible => return 0.0,
            Feasibility::Unknown => {}
        }
        let prior = |s: SubsetId| self.family.subset(s).prior;
        // any still-unknown implying subset is an independent sufficient cause
        let p_none_sufficient = self
            .implying
            .iter()
            .filter(|&&s| record.get(s) == Feasibility::Unknown)
            .fold(1.0 - prior(self.target), |acc, &s| acc * (1.0 - prior(s)));
        // and every still-unknown implied subset an independent necessary condition
        let p_all_necessary = self
            .implied
            .iter()
            .filter(|&&s| record.get(s) == Feasibility::Unknown)
            .fold(1.0, |acc, &s| acc * prior(s));
        (1.0 - p_none_sufficient) * p_all_necessary
    }

    fn candidates(&self, record: &EvaluationRecord) -> Vec<Candidate> {
        let unknown = |s: &SubsetId| record.get(*s) == Feasibility::Unknown;
        let make = |subset: SubsetId, gain: f64| Candidate {
            subset,
            cost: self.family.subset(subset).check_cost,
            gain,
        };
        let mut candidates = Vec::new();
        if record.get(self.target) == Feasibility::Unknown {
            candidates.push(make(self.target, 1.0));
        }
        for s in self.implying.iter().copied().filter(unknown) {
            candidates.push(make(s, self.family.subset(s).prior));
        }
        for s in self.implied.iter().copied().filter(unknown) {
            candidates.push(make(s, 1.0 - self.family.subset(s).prior));
        }
        candidates.retain(|c| c.gain > 0.0);
        candidates.sort_by_key(|c| {
            (
                OrderedFloat(c.cost / c.gain),
                OrderedFloat(c.cost),
                c.subset,
            )
        });
        candidates
    }

    /// Cheapest-per-resolution-chance subset to evaluate next
    pub fn select_next_subset(&self, record: &EvaluationRecord) -> Selection {
        match self.resolve(record) {
            Feasibility::Unknown => {}
            known => return Selection::Resolved(known),
        }
        match self.candidates(record).first() {
            Some(c) => Selection::Evaluate(c.subset),
            // unreachable while unresolved: the target itself is always a candidate
            None => Selection::Evaluate(self.target),
        }
    }

    /// Expected check cost of resolving the target by following the greedy order
    pub fn expected_cost(&self, record: &EvaluationRecord) -> f64 {
        if self.resolve(record).is_known() {
            return 0.0;
        }
        let mut p_unresolved = 1.0;
        let mut total = 0.0;
        for c in self.candidates(record) {
            total += p_unresolved * c.cost;
            p_unresolved *= 1.0 - c.gain;
            if p_unresolved <= 0.0 {
                break;
            }
        }
        total
    }
}
