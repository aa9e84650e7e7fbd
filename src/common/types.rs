//! Common types used throughout lazy_roadmap

use std::fmt;

use itertools::interleave;
use nalgebra::DVector;

/// Sentinel used for unreachable vertices and infeasible edges
pub const INFINITE_COST: f64 = f64::INFINITY;

/// Addition that saturates at `INFINITE_COST`
pub fn closed_plus(a: f64, b: f64) -> f64 {
    if a == INFINITE_COST || b == INFINITE_COST {
        return INFINITE_COST;
    }
    let sum = a + b;
    if sum.is_finite() {
        sum
    } else {
        INFINITE_COST
    }
}

/// Configuration coordinates carried by a roadmap vertex
pub type State = DVector<f64>;

/// Roadmap generation counter
pub type BatchId = usize;

/// Dense vertex handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertex {}", self.0)
    }
}

/// Dense edge handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge {}", self.0)
    }
}

/// Subset handle handed out by `Family::register_subset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsetId(pub usize);

impl SubsetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tri-state result of a feasibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feasibility {
    Unknown,
    Feasible,
    Infeasible,
}

impl Feasibility {
    pub fn from_bool(feasible: bool) -> Self {
        if feasible {
            Feasibility::Feasible
        } else {
            Feasibility::Infeasible
        }
    }

    pub fn is_known(self) -> bool {
        self != Feasibility::Unknown
    }
}

impl Default for Feasibility {
    fn default() -> Self {
        Feasibility::Unknown
    }
}

/// Graph element handed to a feasibility oracle
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Vertex {
        id: VertexId,
        state: &'a State,
    },
    Edge {
        id: EdgeId,
        source: &'a State,
        target: &'a State,
    },
}

impl<'a> fmt::Display for Element<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Vertex { id, .. } => write!(f, "{}", id),
            Element::Edge { id, .. } => write!(f, "{}", id),
        }
    }
}

/// Element on a path, in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathElement {
    Vertex(VertexId),
    Edge(EdgeId),
}

/// Path through the roadmap from start to goal
#[derive(Debug, Clone, PartialEq)]
pub struct LazyPath {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub cost: f64,
}

impl LazyPath {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices and edges interleaved, starting and ending with a vertex
    pub fn elements(&self) -> Vec<PathElement> {
        interleave(
            self.vertices.iter().map(|&v| PathElement::Vertex(v)),
            self.edges.iter().map(|&e| PathElement::Edge(e)),
        )
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_plus_saturates() {
        assert_eq!(closed_plus(1.0, 2.0), 3.0);
        assert_eq!(closed_plus(INFINITE_COST, 2.0), INFINITE_COST);
        assert_eq!(closed_plus(1.0, INFINITE_COST), INFINITE_COST);
        assert_eq!(closed_plus(f64::MAX, f64::MAX), INFINITE_COST);
    }

    #[test]
    fn test_path_elements_interleave() {
        let path = LazyPath {
            vertices: vec![VertexId(0), VertexId(2), VertexId(1)],
            edges: vec![EdgeId(4), EdgeId(7)],
            cost: 2.0,
        };
        assert_eq!(
            path.elements(),
            vec![
                PathElement::Vertex(VertexId(0)),
                PathElement::Edge(EdgeId(4)),
                PathElement::Vertex(VertexId(2)),
                PathElement::Edge(EdgeId(7)),
                PathElement::Vertex(VertexId(1)),
            ]
        );
    }
}
