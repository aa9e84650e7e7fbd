//! Lazy shortest path (LazySP)
//!
//! Plans on optimistic edge weights and only checks feasibility along the
//! current best path. Every iteration the first unresolved element of the
//! path is handed to the oracle, using the subset the effort model rates
//! cheapest per chance of settling the target. An element found
//! infeasible has its weights raised to infinity and the incremental
//! search repairs the path. The loop ends once every element of the best
//! path is known to be feasible, or once no finite path is left.
//!
//! Reference: Dellin, C. M., & Srinivasa, S. S. (2016).
//! "A Unifying Formalism for Shortest Path Problems with Expensive Edge Evaluations via Lazy Best-First Search over Paths with Edge Selectors"

use crate::common::*;
use crate::family::{EffortModel, Selection};
use crate::search::{EuclideanHeuristic, Heuristic, LifelongPlanningAStar};

/// Configuration for the LazySP driver
#[derive(Debug, Clone, Default)]
pub struct LazySpConfig {
    /// Upper bound on search/evaluate iterations per `solve`; `None` runs to completion
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// Every vertex and edge on the path is feasible under the target subset
    Found(LazyPath),
    /// Start and goal are disconnected once infeasible elements are removed
    NoPath,
    /// `max_iterations` ran out before either of the above
    BudgetExhausted,
}

/// Oracle accounting, accumulated across `solve` calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationStats {
    pub iterations: usize,
    pub oracle_calls: usize,
    /// Sum of the check costs of every subset handed to the oracle
    pub check_cost: f64,
}

pub struct LazySp<H = EuclideanHeuristic> {
    config: LazySpConfig,
    model: EffortModel,
    search: LifelongPlanningAStar<H>,
    /// Edges already known to the search
    edges_seen: usize,
    stats: EvaluationStats,
}

impl LazySp<EuclideanHeuristic> {
    pub fn new<G>(
        graph: &G,
        start: VertexId,
        goal: VertexId,
        model: EffortModel,
        config: LazySpConfig,
    ) -> PlanningResult<Self>
    where
        G: LazyWeights + RoadmapTopology + ?Sized,
    {
        Self::with_heuristic(graph, start, goal, model, EuclideanHeuristic, config)
    }
}

impl<H> LazySp<H> {
    pub fn with_heuristic<G>(
        graph: &G,
        start: VertexId,
        goal: VertexId,
        model: EffortModel,
        heuristic: H,
        config: LazySpConfig,
    ) -> PlanningResult<Self>
    where
        G: LazyWeights + ?Sized,
        H: Heuristic<G>,
    {
        let mut search = LifelongPlanningAStar::new(start, goal, heuristic);
        search.initialize(graph)?;
        Ok(LazySp {
            config,
            model,
            search,
            edges_seen: graph.num_edges(),
            stats: EvaluationStats::default(),
        })
    }

    pub fn config(&self) -> &LazySpConfig {
        &self.config
    }

    pub fn model(&self) -> &EffortModel {
        &self.model
    }

    /// Switch the target subset and rederive every lazy weight from the
    /// cached results under the new target. Edges whose weight changes are
    /// handed to the search.
    pub fn set_target<G>(&mut self, graph: &mut G, name: &str) -> PlanningResult<()>
    where
        G: LazyWeights + ?Sized,
        H: Heuristic<G>,
    {
        self.model.set_target(name)?;
        let mut changed = 0;
        for e in (0..graph.num_edges()).map(EdgeId) {
            let weight = if self.is_blocked(&*graph, e) {
                INFINITE_COST
            } else {
                graph.distance(e)
            };
            if graph.weight(e) != weight {
                graph.set_weight(e, weight);
                self.search.update_notify(&*graph, e);
                changed += 1;
            }
        }
        tracing::debug!(target_subset = name, changed, "lazy weights rederived for new target");
        Ok(())
    }

    /// Whether the edge or either endpoint is known infeasible under the target
    fn is_blocked<G: LazyWeights + ?Sized>(&self, graph: &G, e: EdgeId) -> bool {
        let (u, v) = graph.endpoints(e);
        [PathElement::Edge(e), PathElement::Vertex(u), PathElement::Vertex(v)]
            .into_iter()
            .any(|el| self.model.resolve(graph.record(el)) == Feasibility::Infeasible)
    }

    pub fn search(&self) -> &LifelongPlanningAStar<H> {
        &self.search
    }

    pub fn stats(&self) -> &EvaluationStats {
        &self.stats
    }

    /// Hand edges added since the last call to the search.
    ///
    /// New edges touching a vertex already known to be infeasible start out
    /// infinite. `solve` calls this itself, so calling it directly is only
    /// needed to inspect the search between densification and solving.
    pub fn notify_graph_growth<G>(&mut self, graph: &mut G)
    where
        G: LazyWeights + ?Sized,
        H: Heuristic<G>,
    {
        let total = graph.num_edges();
        if self.edges_seen >= total {
            return;
        }
        for e in (self.edges_seen..total).map(EdgeId) {
            if self.is_blocked(&*graph, e) {
                graph.set_weight(e, INFINITE_COST);
            }
            self.search.update_notify(&*graph, e);
        }
        tracing::debug!(
            new_edges = total - self.edges_seen,
            vertices = graph.num_vertices(),
            "search synced with grown roadmap"
        );
        self.edges_seen = total;
    }

    /// Alternate shortest-path search and evaluation until the best path is
    /// certified feasible or no finite path remains.
    pub fn solve<G, O>(&mut self, graph: &mut G, oracle: &mut O) -> PlanningResult<PathOutcome>
    where
        G: LazyWeights + ?Sized,
        H: Heuristic<G>,
        O: FeasibilityOracle + ?Sized,
    {
        self.notify_graph_growth(graph);
        let mut iterations = 0;
        loop {
            if let Some(max) = self.config.max_iterations {
                if iterations >= max {
                    tracing::debug!(iterations, "lazysp iteration budget exhausted");
                    return Ok(PathOutcome::BudgetExhausted);
                }
            }
            iterations += 1;
            self.stats.iterations += 1;

            let cost = self.search.compute_shortest_path(&*graph);
            if cost == INFINITE_COST {
                tracing::debug!(iterations, oracle_calls = self.stats.oracle_calls, "lazysp found no path");
                return Ok(PathOutcome::NoPath);
            }
            let path = match self.search.extract_path(&*graph)? {
                Some(path) => path,
                None => return Ok(PathOutcome::NoPath),
            };

            let pending = path
                .elements()
                .into_iter()
                .map(|el| (el, self.model.resolve(graph.record(el))))
                .find(|&(_, f)| f != Feasibility::Feasible);

            match pending {
                None => {
                    tracing::debug!(
                        cost,
                        vertices = path.vertices.len(),
                        iterations,
                        oracle_calls = self.stats.oracle_calls,
                        "lazysp path certified"
                    );
                    return Ok(PathOutcome::Found(path));
                }
                Some((element, Feasibility::Infeasible)) => {
                    // only an infeasible start or goal survives weight blocking
                    if self.is_endpoint(element) {
                        tracing::debug!(?element, "lazysp endpoint infeasible");
                        return Ok(PathOutcome::NoPath);
                    }
                    self.block(graph, element);
                }
                Some((element, _)) => self.evaluate(graph, oracle, element)?,
            }
        }
    }

    fn is_endpoint(&self, element: PathElement) -> bool {
        match element {
            PathElement::Vertex(v) => v == self.search.start() || v == self.search.goal(),
            PathElement::Edge(_) => false,
        }
    }

    /// Query the oracle once for `element` and apply the result
    fn evaluate<G, O>(&mut self, graph: &mut G, oracle: &mut O, element: PathElement) -> PlanningResult<()>
    where
        G: LazyWeights + ?Sized,
        H: Heuristic<G>,
        O: FeasibilityOracle + ?Sized,
    {
        let subset = match self.model.select_next_subset(graph.record(element)) {
            Selection::Evaluate(subset) => subset,
            Selection::Resolved(_) => return Ok(()),
        };
        let (name, check_cost) = {
            let s = self.model.family().subset(subset);
            (s.name.clone(), s.check_cost)
        };

        let feasible = oracle
            .evaluate(&name, graph.element(element))
            .map_err(|source| PlanningError::OracleFailure {
                subset: name.clone(),
                element: graph.element(element).to_string(),
                source,
            })?;
        self.stats.oracle_calls += 1;
        self.stats.check_cost += check_cost;
        graph.record_mut(element).set(subset, feasible)?;
        tracing::trace!(?element, subset = %name, feasible, "evaluated");

        if self.model.resolve(graph.record(element)) == Feasibility::Infeasible {
            self.block(graph, element);
        }
        Ok(())
    }

    /// Raise the weights an infeasible element contributes to infinity
    fn block<G>(&mut self, graph: &mut G, element: PathElement)
    where
        G: LazyWeights + ?Sized,
        H: Heuristic<G>,
    {
        let edges: Vec<EdgeId> = match element {
            PathElement::Edge(e) => vec![e],
            PathElement::Vertex(v) => graph.incident(v).iter().map(|&(_, e)| e).collect(),
        };
        for e in edges {
            if graph.weight(e) != INFINITE_COST {
                graph.set_weight(e, INFINITE_COST);
                self.search.update_notify(&*graph, e);
            }
        }
    }
}
