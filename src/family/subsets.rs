//! Family of feasibility subsets
//!
//! A family registers named feasibility predicates over one domain, each
//! with a unit check cost and a prior probability of being feasible, plus
//! an inclusion relation: `(a, b)` means every element feasible under `a`
//! is feasible under `b`. The inclusion relation is kept acyclic.

use std::collections::{BTreeSet, HashMap};

use crate::common::{PlanningError, PlanningResult, SubsetId};

/// A registered feasibility predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
    pub name: String,
    /// Cost of one oracle call at this subset
    pub check_cost: f64,
    /// Prior probability that an element is feasible under this subset
    pub prior: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Family {
    subsets: Vec<Subset>,
    index: HashMap<String, SubsetId>,
    inclusions: BTreeSet<(SubsetId, SubsetId)>,
    /// Direct inclusion successors per subset
    implied: Vec<Vec<SubsetId>>,
}

impl Family {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_subset(&mut self, name: &str, check_cost: f64) -> PlanningResult<SubsetId> {
        if self.index.contains_key(name) {
            return Err(PlanningError::InvalidParameter(format!(
                "subset '{}' registered twice",
                name
            )));
        }
        if !(check_cost > 0.0) || !check_cost.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "subset '{}' needs a positive finite check cost, got {}",
                name, check_cost
            )));
        }
        let id = SubsetId(self.subsets.len());
        self.subsets.push(Subset {
            name: name.to_string(),
            check_cost,
            prior: 1.0,
        });
        self.implied.push(Vec::new());
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn set_prior(&mut self, name: &str, prior: f64) -> PlanningResult<()> {
        if !(0.0..=1.0).contains(&prior) {
            return Err(PlanningError::InvalidParameter(format!(
                "prior for '{}' must lie in [0, 1], got {}",
                name, prior
            )));
        }
        let id = self.subset_id(name)?;
        self.subsets[id.index()].prior = prior;
        Ok(())
    }

    /// Register `a ⇒ b`, rejecting anything that would close a cycle
    pub fn add_inclusion(&mut self, a: &str, b: &str) -> PlanningResult<()> {
        let ia = self.subset_id(a)?;
        let ib = self.subset_id(b)?;
        if ia == ib {
            return Err(PlanningError::Configuration(format!(
                "subset '{}' cannot include itself",
                a
            )));
        }
        if self.inclusions.contains(&(ia, ib)) {
            return Ok(());
        }
        if self.implies(ib, ia) {
            return Err(PlanningError::Configuration(format!(
                "inclusion '{}' => '{}' would create a cycle",
                a, b
            )));
        }
        self.inclusions.insert((ia, ib));
        self.implied[ia.index()].push(ib);
        Ok(())
    }

    pub fn subset_id(&self, name: &str) -> PlanningResult<SubsetId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PlanningError::UnknownSubset(name.to_string()))
    }

    pub fn subset(&self, id: SubsetId) -> &Subset {
        &self.subsets[id.index()]
    }

    pub fn subsets(&self) -> impl Iterator<Item = (SubsetId, &Subset)> {
        self.subsets.iter().enumerate().map(|(i, s)| (SubsetId(i), s))
    }

    pub fn inclusions(&self) -> impl Iterator<Item = (SubsetId, SubsetId)> + '_ {
        self.inclusions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Reflexive-transitive inclusion: feasibility under `a` implies feasibility under `b`
    pub fn implies(&self, a: SubsetId, b: SubsetId) -> bool {
        if a == b {
            return true;
        }
        let mut visited = vec![false; self.subsets.len()];
        let mut stack = vec![a];
        visited[a.index()] = true;
        while let Some(s) = stack.pop() {
            for &next in &self.implied[s.index()] {
                if next == b {
                    return true;
                }
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Subsets other than `t` whose feasibility implies `t`'s
    pub fn implying(&self, t: SubsetId) -> Vec<SubsetId> {
        self.subsets()
            .map(|(id, _)| id)
            .filter(|&id| id != t && self.implies(id, t))
            .collect()
    }

    /// Subsets other than `t` implied by `t`'s feasibility
    pub fn implied_by(&self, t: SubsetId) -> Vec<SubsetId> {
        self.subsets()
            .map(|(id, _)| id)
            .filter(|&id| id != t && self.implies(t, id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Family {
        let mut family = Family::new();
        family.register_subset("s1", 1.0).unwrap();
        family.register_subset("s2", 2.0).unwrap();
        family.register_subset("s3", 4.0).unwrap();
        family.add_inclusion("s1", "s2").unwrap();
        family.add_inclusion("s2", "s3").unwrap();
        family
    }

    #[test]
    fn test_transitive_inclusion() {
        let family = chain();
        let s1 = family.subset_id("s1").unwrap();
        let s3 = family.subset_id("s3").unwrap();
        assert!(family.implies(s1, s3));
        assert!(!family.implies(s3, s1));
        assert!(family.implies(s1, s1));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut family = chain();
        assert!(matches!(
            family.add_inclusion("s3", "s1"),
            Err(PlanningError::Configuration(_))
        ));
        assert!(matches!(
            family.add_inclusion("s2", "s2"),
            Err(PlanningError::Configuration(_))
        ));
        // the rejected pair must not be left behind
        assert_eq!(family.inclusions().count(), 2);
    }

    #[test]
    fn test_unknown_and_duplicate_names() {
        let mut family = chain();
        assert!(matches!(
            family.add_inclusion("s1", "nope"),
            Err(PlanningError::UnknownSubset(_))
        ));
        assert!(family.register_subset("s1", 1.0).is_err());
        assert!(family.register_subset("free", 0.0).is_err());
    }

    #[test]
    fn test_priors_validated() {
        let mut family = chain();
        family.set_prior("s2", 0.25).unwrap();
        let s2 = family.subset_id("s2").unwrap();
        assert_eq!(family.subset(s2).prior, 0.25);
        assert!(family.set_prior("s2", 1.5).is_err());
    }

    #[test]
    fn test_implying_and_implied_by() {
        let family = chain();
        let s2 = family.subset_id("s2").unwrap();
        assert_eq!(family.implying(s2), vec![SubsetId(0)]);
        assert_eq!(family.implied_by(s2), vec![SubsetId(2)]);
    }
}
