//! Generic roadmap driver
//!
//! Owns the graph and its nearest-neighbor index and hands both to an
//! injected `RoadmapStrategy` whenever more density is requested.

use crate::common::*;
use crate::roadmap::domain::Domain;
use crate::roadmap::graph::RoadmapGraph;
use crate::roadmap::halton_dens::HaltonDensRoadmap;
use crate::roadmap::nearest_neighbors::LinearNearestNeighbors;

pub struct Roadmap<S: RoadmapStrategy, N: NearestNeighborIndex = LinearNearestNeighbors> {
    strategy: S,
    graph: RoadmapGraph,
    nn: N,
}

impl<S: RoadmapStrategy> Roadmap<S, LinearNearestNeighbors> {
    pub fn new(strategy: S) -> Self {
        Self::with_index(strategy, LinearNearestNeighbors::new())
    }
}

impl<S: RoadmapStrategy, N: NearestNeighborIndex> Roadmap<S, N> {
    /// Use a caller-provided nearest-neighbor index; it must be empty
    pub fn with_index(strategy: S, nn: N) -> Self {
        debug_assert!(nn.is_empty(), "nearest-neighbor index must start empty");
        Roadmap {
            strategy,
            graph: RoadmapGraph::new(),
            nn,
        }
    }

    /// Grow until the graph holds `target_count` non-shadow vertices
    pub fn densify(&mut self, target_count: usize) -> PlanningResult<usize> {
        self.strategy.grow(&mut self.graph, &mut self.nn, target_count)
    }

    pub fn add_shadow_vertex(&mut self, coords: &[f64]) -> PlanningResult<VertexId> {
        self.strategy
            .add_shadow_vertex(&mut self.graph, &mut self.nn, coords)
    }

    pub fn num_batches_generated(&self) -> usize {
        self.strategy.num_batches_generated()
    }

    pub fn graph(&self) -> &RoadmapGraph {
        &self.graph
    }

    /// Mutable graph access for lazy weight updates; topology changes go through the strategy
    pub fn graph_mut(&mut self) -> &mut RoadmapGraph {
        &mut self.graph
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn into_graph(self) -> RoadmapGraph {
        self.graph
    }
}

impl<D: Domain, N: NearestNeighborIndex> Roadmap<HaltonDensRoadmap<D>, N> {
    /// Add the next Halton batch
    pub fn generate(&mut self) -> PlanningResult<usize> {
        self.strategy.generate(&mut self.graph, &mut self.nn)
    }
}
