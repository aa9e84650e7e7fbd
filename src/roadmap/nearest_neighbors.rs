// Brute-force nearest neighbor index

use crate::common::{NearestNeighborIndex, State, VertexId};

/// Euclidean distance between two states
pub fn euclidean_distance(a: &State, b: &State) -> f64 {
    (a - b).norm()
}

/// Linear scan over every inserted point
#[derive(Debug, Clone, Default)]
pub struct LinearNearestNeighbors {
    points: Vec<(VertexId, State)>,
}

impl LinearNearestNeighbors {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NearestNeighborIndex for LinearNearestNeighbors {
    fn insert(&mut self, v: VertexId, point: &State) {
        self.points.push((v, point.clone()));
    }

    fn query_radius(&self, point: &State, radius: f64) -> Vec<(VertexId, f64)> {
        self.points
            .iter()
            .filter_map(|(v, p)| {
                let d = euclidean_distance(point, p);
                if d <= radius {
                    Some((*v, d))
                } else {
                    None
                }
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
