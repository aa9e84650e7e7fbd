//! Capability traits at the seams between roadmap, search and lazy evaluation
//!
//! Each component depends only on the slice of the graph it needs:
//! the roadmap builder grows topology, the search reads adjacency and
//! weights, and the lazy driver writes weights and evaluation records.

use crate::common::error::{OracleError, PlanningResult};
use crate::common::types::*;
use crate::family::EvaluationRecord;

/// Growth access used by roadmap strategies
pub trait RoadmapTopology {
    /// Add a vertex created in `batch`
    fn add_vertex(&mut self, state: State, batch: BatchId, is_shadow: bool) -> VertexId;

    /// Add an undirected edge; an existing edge between the pair is returned unchanged
    fn add_edge(&mut self, u: VertexId, v: VertexId, distance: f64, batch: BatchId) -> PlanningResult<EdgeId>;

    fn num_vertices(&self) -> usize;

    fn num_edges(&self) -> usize;

    /// Vertices that count toward batch density targets
    fn num_non_shadow_vertices(&self) -> usize;

    fn vertex_state(&self, v: VertexId) -> &State;
}

/// Read-only adjacency and weight access used by the incremental search
pub trait SearchGraph {
    fn num_vertices(&self) -> usize;

    fn num_edges(&self) -> usize;

    /// Incident `(neighbor, edge)` pairs of `v`
    fn incident(&self, v: VertexId) -> &[(VertexId, EdgeId)];

    /// Current (possibly optimistic) edge weight
    fn weight(&self, e: EdgeId) -> f64;

    fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId);

    fn find_edge(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.incident(u)
            .iter()
            .find(|(n, _)| *n == v)
            .map(|(_, e)| *e)
    }
}

/// Read-write weight and evaluation-record access used by the lazy driver
pub trait LazyWeights: SearchGraph {
    fn set_weight(&mut self, e: EdgeId, weight: f64);

    /// Geometric length of an edge, always known
    fn distance(&self, e: EdgeId) -> f64;

    fn record(&self, element: PathElement) -> &EvaluationRecord;

    fn record_mut(&mut self, element: PathElement) -> &mut EvaluationRecord;

    /// Borrow the payload the oracle needs to check `element`
    fn element(&self, element: PathElement) -> Element<'_>;
}

/// Radius queries over already inserted vertices
pub trait NearestNeighborIndex {
    fn insert(&mut self, v: VertexId, point: &State);

    /// All inserted vertices within `radius` of `point`, with their distances
    fn query_radius(&self, point: &State, radius: f64) -> Vec<(VertexId, f64)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Roadmap growth policy injected into `Roadmap`
pub trait RoadmapStrategy {
    /// Grow `graph` until it holds `target_count` non-shadow vertices.
    ///
    /// Returns the number of vertices added; a satisfied target adds none.
    fn grow(
        &mut self,
        graph: &mut dyn RoadmapTopology,
        nn: &mut dyn NearestNeighborIndex,
        target_count: usize,
    ) -> PlanningResult<usize>;

    /// Insert a vertex excluded from density accounting, e.g. a start or goal
    fn add_shadow_vertex(
        &mut self,
        graph: &mut dyn RoadmapTopology,
        nn: &mut dyn NearestNeighborIndex,
        coords: &[f64],
    ) -> PlanningResult<VertexId>;

    fn num_batches_generated(&self) -> usize;
}

/// External feasibility checker for one subset of a family
pub trait FeasibilityOracle {
    fn evaluate(&mut self, subset: &str, element: Element<'_>) -> Result<bool, OracleError>;
}
