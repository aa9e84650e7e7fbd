//! Undirected roadmap graph
//!
//! Vertices and edges are stored densely and never removed. Every edge
//! keeps its geometric distance next to a lazy weight that starts at the
//! distance (an optimistic lower bound) and is overwritten once the edge
//! has been evaluated.

use std::collections::HashMap;

use crate::common::*;
use crate::family::EvaluationRecord;

#[derive(Debug, Clone)]
pub struct VertexData {
    pub state: State,
    pub batch: BatchId,
    pub is_shadow: bool,
    pub evaluation: EvaluationRecord,
}

#[derive(Debug, Clone)]
pub struct EdgeData {
    pub source: VertexId,
    pub target: VertexId,
    pub distance: f64,
    pub weight: f64,
    pub batch: BatchId,
    pub evaluation: EvaluationRecord,
}

#[derive(Debug, Clone, Default)]
pub struct RoadmapGraph {
    vertices: Vec<VertexData>,
    edges: Vec<EdgeData>,
    adjacency: Vec<Vec<(VertexId, EdgeId)>>,
    edge_index: HashMap<(VertexId, VertexId), EdgeId>,
    num_shadow: usize,
}

fn edge_key(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

impl RoadmapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&self, v: VertexId) -> &VertexData {
        &self.vertices[v.index()]
    }

    pub fn edge(&self, e: EdgeId) -> &EdgeData {
        &self.edges[e.index()]
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter().enumerate().map(|(i, v)| (VertexId(i), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_shadow_vertices(&self) -> usize {
        self.num_shadow
    }

    pub fn last_batch(&self) -> Option<BatchId> {
        self.vertices.last().map(|v| v.batch)
    }
}

impl RoadmapTopology for RoadmapGraph {
    fn add_vertex(&mut self, state: State, batch: BatchId, is_shadow: bool) -> VertexId {
        debug_assert!(
            self.last_batch().map_or(true, |last| last <= batch),
            "vertex batch ids must be non-decreasing"
        );
        let id = VertexId(self.vertices.len());
        self.vertices.push(VertexData {
            state,
            batch,
            is_shadow,
            evaluation: EvaluationRecord::new(),
        });
        self.adjacency.push(Vec::new());
        if is_shadow {
            self.num_shadow += 1;
        }
        id
    }

    fn add_edge(&mut self, u: VertexId, v: VertexId, distance: f64, batch: BatchId) -> PlanningResult<EdgeId> {
        if u == v {
            return Err(PlanningError::InvalidParameter(format!("self loop on {}", u)));
        }
        if u.index() >= self.vertices.len() || v.index() >= self.vertices.len() {
            return Err(PlanningError::InvalidParameter(format!(
                "edge between {} and {} references a missing vertex",
                u, v
            )));
        }
        if !(distance >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "edge distance must be non-negative, got {}",
                distance
            )));
        }
        let key = edge_key(u, v);
        if let Some(&existing) = self.edge_index.get(&key) {
            return Ok(existing);
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(EdgeData {
            source: u,
            target: v,
            distance,
            weight: distance,
            batch,
            evaluation: EvaluationRecord::new(),
        });
        self.adjacency[u.index()].push((v, id));
        self.adjacency[v.index()].push((u, id));
        self.edge_index.insert(key, id);
        Ok(id)
    }

    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn num_edges(&self) -> usize {
        self.edges.len()
    }

    fn num_non_shadow_vertices(&self) -> usize {
        self.vertices.len() - self.num_shadow
    }

    fn vertex_state(&self, v: VertexId) -> &State {
        &self.vertices[v.index()].state
    }
}

impl SearchGraph for RoadmapGraph {
    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn num_edges(&self) -> usize {
        self.edges.len()
    }

    fn incident(&self, v: VertexId) -> &[(VertexId, EdgeId)] {
        &self.adjacency[v.index()]
    }

    fn weight(&self, e: EdgeId) -> f64 {
        self.edges[e.index()].weight
    }

    fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        let edge = &self.edges[e.index()];
        (edge.source, edge.target)
    }

    fn find_edge(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&edge_key(u, v)).copied()
    }
}

impl LazyWeights for RoadmapGraph {
    fn set_weight(&mut self, e: EdgeId, weight: f64) {
        self.edges[e.index()].weight = weight;
    }

    fn distance(&self, e: EdgeId) -> f64 {
        self.edges[e.index()].distance
    }

    fn record(&self, element: PathElement) -> &EvaluationRecord {
        match element {
            PathElement::Vertex(v) => &self.vertices[v.index()].evaluation,
            PathElement::Edge(e) => &self.edges[e.index()].evaluation,
        }
    }

    fn record_mut(&mut self, element: PathElement) -> &mut EvaluationRecord {
        match element {
            PathElement::Vertex(v) => &mut self.vertices[v.index()].evaluation,
            PathElement::Edge(e) => &mut self.edges[e.index()].evaluation,
        }
    }

    fn element(&self, element: PathElement) -> Element<'_> {
        match element {
            PathElement::Vertex(v) => Element::Vertex {
                id: v,
                state: &self.vertices[v.index()].state,
            },
            PathElement::Edge(e) => {
                let edge = &self.edges[e.index()];
                Element::Edge {
                    id: e,
                    source: &self.vertices[edge.source.index()].state,
                    target: &self.vertices[edge.target.index()].state,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn point(x: f64) -> State {
        DVector::from_vec(vec![x])
    }

    #[test]
    fn test_no_parallel_edges() {
        let mut g = RoadmapGraph::new();
        let a = g.add_vertex(point(0.0), 0, false);
        let b = g.add_vertex(point(1.0), 0, false);
        let e1 = g.add_edge(a, b, 1.0, 0).unwrap();
        let e2 = g.add_edge(b, a, 1.0, 0).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(RoadmapTopology::num_edges(&g), 1);
        assert_eq!(g.incident(a), &[(b, e1)]);
        assert_eq!(g.find_edge(b, a), Some(e1));
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut g = RoadmapGraph::new();
        let a = g.add_vertex(point(0.0), 0, false);
        assert!(g.add_edge(a, a, 0.0, 0).is_err());
        assert!(g.add_edge(a, VertexId(5), 1.0, 0).is_err());
    }

    #[test]
    fn test_shadow_vertices_not_counted() {
        let mut g = RoadmapGraph::new();
        g.add_vertex(point(0.0), 0, true);
        g.add_vertex(point(1.0), 0, false);
        assert_eq!(RoadmapTopology::num_vertices(&g), 2);
        assert_eq!(g.num_non_shadow_vertices(), 1);
        assert_eq!(g.num_shadow_vertices(), 1);
    }

    #[test]
    fn test_lazy_weight_starts_at_distance() {
        let mut g = RoadmapGraph::new();
        let a = g.add_vertex(point(0.0), 0, false);
        let b = g.add_vertex(point(2.5), 0, false);
        let e = g.add_edge(a, b, 2.5, 0).unwrap();
        assert_eq!(g.weight(e), 2.5);
        g.set_weight(e, INFINITE_COST);
        assert_eq!(g.weight(e), INFINITE_COST);
        assert_eq!(g.distance(e), 2.5);
    }

    #[test]
    fn test_records_per_element() {
        let mut g = RoadmapGraph::new();
        let a = g.add_vertex(point(0.0), 0, false);
        let b = g.add_vertex(point(1.0), 0, false);
        let e = g.add_edge(a, b, 1.0, 0).unwrap();
        g.record_mut(PathElement::Edge(e)).set(SubsetId(0), false).unwrap();
        assert_eq!(g.record(PathElement::Edge(e)).get(SubsetId(0)), Feasibility::Infeasible);
        assert_eq!(g.record(PathElement::Vertex(a)).get(SubsetId(0)), Feasibility::Unknown);
        match g.element(PathElement::Edge(e)) {
            Element::Edge { source, target, .. } => {
                assert_eq!(source[0], 0.0);
                assert_eq!(target[0], 1.0);
            }
            _ => panic!("expected edge element"),
        }
    }
}
