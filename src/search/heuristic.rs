//! Heuristics for the incremental search

use crate::common::{RoadmapTopology, VertexId};
use crate::roadmap::euclidean_distance;

/// Lower bound on the remaining cost from a vertex to the goal
pub trait Heuristic<G: ?Sized> {
    fn estimate(&self, graph: &G, v: VertexId, goal: VertexId) -> f64;
}

/// Dijkstra ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl<G: ?Sized> Heuristic<G> for ZeroHeuristic {
    fn estimate(&self, _graph: &G, _v: VertexId, _goal: VertexId) -> f64 {
        0.0
    }
}

/// Straight-line distance between vertex states.
///
/// Admissible whenever edge weights are never below their geometric length.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanHeuristic;

impl<G: RoadmapTopology + ?Sized> Heuristic<G> for EuclideanHeuristic {
    fn estimate(&self, graph: &G, v: VertexId, goal: VertexId) -> f64 {
        euclidean_distance(graph.vertex_state(v), graph.vertex_state(goal))
    }
}
