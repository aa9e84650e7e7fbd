//! Halton offset r-disk roadmap
//!
//! Densifies a bounded real vector space in batches. Vertex `n` sits at a
//! seeded offset point shifted by the `n`-th Halton point scaled to the
//! bounds, wrapped back into the box. Each batch connects its new vertices
//! to every existing vertex within the batch radius
//! `r1 * (1 / (i + 1))^(1 / d)`, which shrinks as density grows so the
//! expected branching factor stays roughly constant.

use crate::common::*;
use crate::roadmap::domain::{Domain, RealVectorBounds};
use crate::sampling::{HaltonSequence, SeededSampler};

/// Configuration for the Halton offset roadmap
#[derive(Debug, Clone)]
pub struct RoadmapConfig {
    /// Non-shadow vertices added per batch
    pub n_per_batch: usize,
    /// Connection radius of batch 0
    pub radius_first_batch: f64,
    /// Seed for the offset point
    pub seed: u64,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            n_per_batch: 100,
            radius_first_batch: 1.0,
            seed: 0,
        }
    }
}

pub struct HaltonDensRoadmap<D: Domain> {
    config: RoadmapConfig,
    domain: D,
    bounds: RealVectorBounds,
    offset: Vec<f64>,
    sequence: HaltonSequence,
    num_batches_generated: usize,
    edges_generated: usize,
}

impl<D: Domain> HaltonDensRoadmap<D> {
    pub fn new(domain: D, config: RoadmapConfig) -> PlanningResult<Self> {
        let bounds = domain
            .bounds()
            .cloned()
            .ok_or_else(|| {
                PlanningError::PreconditionViolation(
                    "Halton roadmap only supports bounded real vector spaces".to_string(),
                )
            })?;
        bounds.validate()?;
        if bounds.dimension() != domain.dimension() {
            return Err(PlanningError::PreconditionViolation(format!(
                "domain reports dimension {} but its bounds have {}",
                domain.dimension(),
                bounds.dimension()
            )));
        }
        let sequence = HaltonSequence::new(bounds.dimension())?;
        if config.n_per_batch == 0 {
            return Err(PlanningError::InvalidParameter(
                "n_per_batch must be positive".to_string(),
            ));
        }
        if !(config.radius_first_batch > 0.0) || !config.radius_first_batch.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "radius_first_batch must be positive and finite, got {}",
                config.radius_first_batch
            )));
        }

        let mut sampler = SeededSampler::new(config.seed);
        let offset = sampler.uniform_point(&bounds.low, &bounds.high)?;

        Ok(HaltonDensRoadmap {
            config,
            domain,
            bounds,
            offset,
            sequence,
            num_batches_generated: 0,
            edges_generated: 0,
        })
    }

    pub fn config(&self) -> &RoadmapConfig {
        &self.config
    }

    pub fn dimension(&self) -> usize {
        self.bounds.dimension()
    }

    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    pub fn vertices_generated(&self) -> usize {
        self.sequence.index() as usize
    }

    pub fn edges_generated(&self) -> usize {
        self.edges_generated
    }

    /// Connection radius for batch `i_batch`
    pub fn root_radius(&self, i_batch: usize) -> f64 {
        self.config.radius_first_batch
            * (1.0 / (i_batch as f64 + 1.0)).powf(1.0 / self.dimension() as f64)
    }

    /// Grow by one batch of `n_per_batch` vertices
    pub fn generate(
        &mut self,
        graph: &mut dyn RoadmapTopology,
        nn: &mut dyn NearestNeighborIndex,
    ) -> PlanningResult<usize> {
        let target = (self.num_batches_generated + 1) * self.config.n_per_batch;
        self.grow(graph, nn, target)
    }

    /// Coordinates of vertex number `n`
    pub fn sample(&self, n: u64) -> Vec<f64> {
        self.shift(&self.sequence.point(n))
    }

    fn sample_next(&mut self) -> Vec<f64> {
        let unit = self.sequence.next_point();
        self.shift(&unit)
    }

    /// Offset a unit-cube point by the seeded offset, wrapping once per dimension
    fn shift(&self, unit: &[f64]) -> Vec<f64> {
        unit.iter()
            .enumerate()
            .map(|(k, &u)| {
                let extent = self.bounds.extent(k);
                let mut value = self.offset[k] + extent * u;
                if self.bounds.high[k] < value {
                    value -= extent;
                }
                value
            })
            .collect()
    }

    fn connect(
        &mut self,
        graph: &mut dyn RoadmapTopology,
        v: VertexId,
        near: Vec<(VertexId, f64)>,
        batch: BatchId,
    ) -> PlanningResult<()> {
        for (u, d) in near {
            graph.add_edge(v, u, d, batch)?;
            self.edges_generated += 1;
        }
        Ok(())
    }
}

impl<D: Domain> RoadmapStrategy for HaltonDensRoadmap<D> {
    fn grow(
        &mut self,
        graph: &mut dyn RoadmapTopology,
        nn: &mut dyn NearestNeighborIndex,
        target_count: usize,
    ) -> PlanningResult<usize> {
        if graph.num_non_shadow_vertices() >= target_count {
            return Ok(0);
        }
        let batch = self.num_batches_generated;
        let radius = self.root_radius(batch);
        let mut added = 0;
        while graph.num_non_shadow_vertices() < target_count {
            let coords = self.sample_next();
            let state = self.domain.materialize(coords);
            let near = nn.query_radius(&state, radius);
            let v = graph.add_vertex(state, batch, false);
            self.connect(graph, v, near, batch)?;
            nn.insert(v, graph.vertex_state(v));
            added += 1;
        }
        self.num_batches_generated += 1;
        tracing::debug!(
            batch,
            radius,
            added,
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            "roadmap batch generated"
        );
        Ok(added)
    }

    fn add_shadow_vertex(
        &mut self,
        graph: &mut dyn RoadmapTopology,
        nn: &mut dyn NearestNeighborIndex,
        coords: &[f64],
    ) -> PlanningResult<VertexId> {
        if coords.len() != self.dimension() {
            return Err(PlanningError::InvalidParameter(format!(
                "shadow vertex has {} coordinates, domain has {}",
                coords.len(),
                self.dimension()
            )));
        }
        let batch = self.num_batches_generated.saturating_sub(1);
        let radius = self.root_radius(batch);
        let state = self.domain.materialize(coords.to_vec());
        let near = nn.query_radius(&state, radius);
        let v = graph.add_vertex(state, batch, true);
        self.connect(graph, v, near, batch)?;
        nn.insert(v, graph.vertex_state(v));
        tracing::debug!(vertex = v.index(), batch, radius, "shadow vertex added");
        Ok(v)
    }

    fn num_batches_generated(&self) -> usize {
        self.num_batches_generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::domain::RealVectorSpace;
    use crate::roadmap::graph::RoadmapGraph;
    use crate::roadmap::nearest_neighbors::LinearNearestNeighbors;
    use proptest::prelude::*;

    struct UnboundedLine;

    impl Domain for UnboundedLine {
        fn dimension(&self) -> usize {
            1
        }

        fn bounds(&self) -> Option<&RealVectorBounds> {
            None
        }
    }

    fn line_roadmap(seed: u64) -> HaltonDensRoadmap<RealVectorSpace> {
        let space = RealVectorSpace::new(RealVectorBounds::uniform(1, 0.0, 10.0)).unwrap();
        let config = RoadmapConfig {
            n_per_batch: 5,
            radius_first_batch: 5.0,
            seed,
        };
        HaltonDensRoadmap::new(space, config).unwrap()
    }

    fn build(dimension: usize, seed: u64, batches: usize) -> RoadmapGraph {
        let space =
            RealVectorSpace::new(RealVectorBounds::uniform(dimension, -1.0, 1.0)).unwrap();
        let config = RoadmapConfig {
            n_per_batch: 8,
            radius_first_batch: 0.8,
            seed,
        };
        let mut roadmap = HaltonDensRoadmap::new(space, config).unwrap();
        let mut graph = RoadmapGraph::new();
        let mut nn = LinearNearestNeighbors::new();
        for _ in 0..batches {
            roadmap.generate(&mut graph, &mut nn).unwrap();
        }
        graph
    }

    #[test]
    fn test_line_example() {
        let mut roadmap = line_roadmap(42);
        let mut graph = RoadmapGraph::new();
        let mut nn = LinearNearestNeighbors::new();

        assert_eq!(roadmap.root_radius(0), 5.0);
        assert!((roadmap.root_radius(1) - 2.5).abs() < 1e-12);

        let added = roadmap.generate(&mut graph, &mut nn).unwrap();
        assert_eq!(added, 5);
        assert_eq!(graph.num_vertices(), 5);
        assert_eq!(roadmap.num_batches_generated(), 1);

        let xs: Vec<f64> = graph.vertices().map(|(_, v)| v.state[0]).collect();
        assert_eq!(xs[0], roadmap.offset()[0]);
        for &x in &xs {
            assert!(x >= 0.0 && x <= 10.0);
        }
        // successive Halton base-2 shifts of the offset, modulo the extent
        let shifts = [0.0, 5.0, 2.5, 7.5, 1.25];
        for (x, s) in xs.iter().zip(shifts.iter()) {
            assert!(((x - xs[0]).rem_euclid(10.0) - s).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_example_edges_follow_radius() {
        let mut roadmap = line_roadmap(42);
        let mut graph = RoadmapGraph::new();
        let mut nn = LinearNearestNeighbors::new();
        roadmap.generate(&mut graph, &mut nn).unwrap();

        for (_, e) in graph.edges() {
            assert!(e.distance <= 5.0);
            assert_eq!(e.batch, 0);
        }
        let xs: Vec<f64> = graph.vertices().map(|(_, v)| v.state[0]).collect();
        for i in 0..xs.len() {
            for j in (i + 1)..xs.len() {
                let d = (xs[i] - xs[j]).abs();
                let connected = graph.find_edge(VertexId(i), VertexId(j)).is_some();
                if d < 5.0 - 1e-9 {
                    assert!(connected);
                } else if d > 5.0 + 1e-9 {
                    assert!(!connected);
                }
            }
        }
    }

    #[test]
    fn test_generate_batches_and_batch_ids() {
        let mut roadmap = line_roadmap(3);
        let mut graph = RoadmapGraph::new();
        let mut nn = LinearNearestNeighbors::new();
        roadmap.generate(&mut graph, &mut nn).unwrap();
        roadmap.generate(&mut graph, &mut nn).unwrap();
        assert_eq!(graph.num_vertices(), 10);
        assert_eq!(roadmap.vertices_generated(), 10);
        assert_eq!(roadmap.edges_generated(), graph.num_edges());

        let batches: Vec<BatchId> = graph.vertices().map(|(_, v)| v.batch).collect();
        assert!(batches.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(batches[9], 1);
        let edge_batches: Vec<BatchId> = graph.edges().map(|(_, e)| e.batch).collect();
        assert!(edge_batches.windows(2).all(|w| w[0] <= w[1]));
        for (_, e) in graph.edges().filter(|(_, e)| e.batch == 1) {
            assert!(e.distance <= roadmap.root_radius(1));
        }
    }

    #[test]
    fn test_satisfied_target_is_noop() {
        let mut roadmap = line_roadmap(3);
        let mut graph = RoadmapGraph::new();
        let mut nn = LinearNearestNeighbors::new();
        roadmap.grow(&mut graph, &mut nn, 5).unwrap();
        let edges = graph.num_edges();
        assert_eq!(roadmap.grow(&mut graph, &mut nn, 5).unwrap(), 0);
        assert_eq!(roadmap.grow(&mut graph, &mut nn, 3).unwrap(), 0);
        assert_eq!(graph.num_vertices(), 5);
        assert_eq!(graph.num_edges(), edges);
        assert_eq!(roadmap.num_batches_generated(), 1);
    }

    #[test]
    fn test_shadow_vertex_connected_and_not_counted() {
        let mut roadmap = line_roadmap(42);
        let mut graph = RoadmapGraph::new();
        let mut nn = LinearNearestNeighbors::new();
        let start = roadmap
            .add_shadow_vertex(&mut graph, &mut nn, &[0.5])
            .unwrap();
        assert!(graph.incident(start).is_empty());
        roadmap.generate(&mut graph, &mut nn).unwrap();

        assert_eq!(graph.num_vertices(), 6);
        assert_eq!(graph.num_non_shadow_vertices(), 5);
        assert!(graph.vertex(start).is_shadow);
        // later batches connect to the shadow vertex
        assert!(!graph.incident(start).is_empty());
        assert!(roadmap.add_shadow_vertex(&mut graph, &mut nn, &[0.5, 1.0]).is_err());
    }

    #[test]
    fn test_unbounded_domain_rejected() {
        let result = HaltonDensRoadmap::new(UnboundedLine, RoadmapConfig::default());
        assert!(matches!(result, Err(PlanningError::PreconditionViolation(_))));
    }

    #[test]
    fn test_too_many_dimensions_rejected() {
        let space = RealVectorSpace::new(RealVectorBounds::uniform(40, 0.0, 1.0)).unwrap();
        let result = HaltonDensRoadmap::new(space, RoadmapConfig::default());
        assert!(matches!(result, Err(PlanningError::Configuration(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let space = RealVectorSpace::new(RealVectorBounds::uniform(2, 0.0, 1.0)).unwrap();
        let config = RoadmapConfig {
            n_per_batch: 0,
            ..Default::default()
        };
        assert!(HaltonDensRoadmap::new(space.clone(), config).is_err());
        let config = RoadmapConfig {
            radius_first_batch: -1.0,
            ..Default::default()
        };
        assert!(HaltonDensRoadmap::new(space, config).is_err());
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_roadmap(seed in any::<u64>(), dimension in 1usize..4) {
            let a = build(dimension, seed, 3);
            let b = build(dimension, seed, 3);
            prop_assert_eq!(a.num_vertices(), b.num_vertices());
            prop_assert_eq!(a.num_edges(), b.num_edges());
            for ((_, va), (_, vb)) in a.vertices().zip(b.vertices()) {
                let bits_a: Vec<u64> = va.state.iter().map(|x| x.to_bits()).collect();
                let bits_b: Vec<u64> = vb.state.iter().map(|x| x.to_bits()).collect();
                prop_assert_eq!(bits_a, bits_b);
            }
            for ((_, ea), (_, eb)) in a.edges().zip(b.edges()) {
                prop_assert_eq!((ea.source, ea.target), (eb.source, eb.target));
                prop_assert_eq!(ea.distance.to_bits(), eb.distance.to_bits());
            }
        }

        #[test]
        fn prop_radius_strictly_decreasing(dimension in 1usize..8, i in 0usize..1000) {
            let space = RealVectorSpace::new(RealVectorBounds::uniform(dimension, 0.0, 1.0)).unwrap();
            let roadmap = HaltonDensRoadmap::new(space, RoadmapConfig::default()).unwrap();
            prop_assert!(roadmap.root_radius(i + 1) < roadmap.root_radius(i));
            prop_assert!(roadmap.root_radius(i) <= roadmap.config().radius_first_batch);
        }
    }

    #[test]
    fn test_radius_converges_to_zero() {
        let space = RealVectorSpace::new(RealVectorBounds::uniform(2, 0.0, 1.0)).unwrap();
        let roadmap = HaltonDensRoadmap::new(space, RoadmapConfig::default()).unwrap();
        assert!(roadmap.root_radius(1_000_000) < 1e-2);
    }
}
