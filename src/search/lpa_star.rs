//! Lifelong Planning A* (LPA*)
//!
//! Incremental shortest paths over an undirected graph whose edge weights
//! change over time. Each vertex carries a cost-to-start estimate `g` and a
//! one-step lookahead `rhs`; only locally inconsistent vertices
//! (`g != rhs`) sit in the priority queue. After a weight change only the
//! endpoints are re-examined and the search repairs the affected region
//! instead of starting over.
//!
//! Reference: Koenig, S., Likhachev, M., & Furcy, D. (2004).
//! "Lifelong Planning A*"

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::common::*;
use crate::search::heuristic::Heuristic;

/// Two-part priority `(min(g, rhs) + h, min(g, rhs))`, compared lexicographically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    k1: OrderedFloat<f64>,
    k2: OrderedFloat<f64>,
}

impl Key {
    pub fn new(k1: f64, k2: f64) -> Self {
        Key {
            k1: OrderedFloat(k1),
            k2: OrderedFloat(k2),
        }
    }

    pub fn k1(&self) -> f64 {
        self.k1.into_inner()
    }

    pub fn k2(&self) -> f64 {
        self.k2.into_inner()
    }
}

pub struct LifelongPlanningAStar<H> {
    start: VertexId,
    goal: VertexId,
    heuristic: H,
    g: Vec<f64>,
    rhs: Vec<f64>,
    /// Current key of every queued vertex; heap entries that disagree are stale
    queued: Vec<Option<Key>>,
    heap: BinaryHeap<Reverse<(Key, VertexId)>>,
    expansions: usize,
}

impl<H> LifelongPlanningAStar<H> {
    pub fn new(start: VertexId, goal: VertexId, heuristic: H) -> Self {
        LifelongPlanningAStar {
            start,
            goal,
            heuristic,
            g: Vec::new(),
            rhs: Vec::new(),
            queued: Vec::new(),
            heap: BinaryHeap::new(),
            expansions: 0,
        }
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn goal(&self) -> VertexId {
        self.goal
    }

    pub fn g(&self, v: VertexId) -> f64 {
        self.g.get(v.index()).copied().unwrap_or(INFINITE_COST)
    }

    pub fn rhs(&self, v: VertexId) -> f64 {
        if v == self.start {
            return 0.0;
        }
        self.rhs.get(v.index()).copied().unwrap_or(INFINITE_COST)
    }

    pub fn is_consistent(&self, v: VertexId) -> bool {
        self.g(v) == self.rhs(v)
    }

    /// Number of locally inconsistent vertices waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.queued.iter().filter(|k| k.is_some()).count()
    }

    /// Vertex expansions since construction
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Extend per-vertex state to cover vertices added since the last call.
    ///
    /// The first sync seeds the queue with the start vertex.
    fn sync<G>(&mut self, graph: &G)
    where
        G: SearchGraph + ?Sized,
        H: Heuristic<G>,
    {
        let n = graph.num_vertices();
        if self.g.len() >= n {
            return;
        }
        let fresh = self.g.is_empty();
        self.g.resize(n, INFINITE_COST);
        self.rhs.resize(n, INFINITE_COST);
        self.queued.resize(n, None);
        if fresh && self.start.index() < n {
            let s = self.start.index();
            self.rhs[s] = 0.0;
            let key = self.calculate_key(graph, self.start);
            self.queued[s] = Some(key);
            self.heap.push(Reverse((key, self.start)));
        }
    }

    fn check_vertex<G: SearchGraph + ?Sized>(graph: &G, v: VertexId) -> PlanningResult<()> {
        if v.index() >= graph.num_vertices() {
            return Err(PlanningError::InvalidParameter(format!(
                "{} is not in a graph of {} vertices",
                v,
                graph.num_vertices()
            )));
        }
        Ok(())
    }

    /// Pop stale heap entries and return the live minimum
    fn top(&mut self) -> Option<(Key, VertexId)> {
        while let Some(&Reverse((key, v))) = self.heap.peek() {
            if self.queued[v.index()] == Some(key) {
                return Some((key, v));
            }
            self.heap.pop();
        }
        None
    }

    pub fn calculate_key<G>(&self, graph: &G, v: VertexId) -> Key
    where
        G: SearchGraph + ?Sized,
        H: Heuristic<G>,
    {
        let m = self.g(v).min(self.rhs(v));
        let h = self.heuristic.estimate(graph, v, self.goal);
        Key::new(closed_plus(m, h), m)
    }

    /// Reset all estimates: `rhs(start) = 0`, everything else infinite
    pub fn initialize<G>(&mut self, graph: &G) -> PlanningResult<()>
    where
        G: SearchGraph + ?Sized,
        H: Heuristic<G>,
    {
        Self::check_vertex(graph, self.start)?;
        Self::check_vertex(graph, self.goal)?;
        self.g.clear();
        self.rhs.clear();
        self.queued.clear();
        self.heap.clear();
        self.sync(graph);
        let n = graph.num_vertices();
        tracing::debug!(
            start = self.start.index(),
            goal = self.goal.index(),
            vertices = n,
            "lpa* initialized"
        );
        Ok(())
    }

    /// Recompute `rhs(v)` and requeue or dequeue `v` accordingly
    pub fn update_vertex<G>(&mut self, graph: &G, v: VertexId)
    where
        G: SearchGraph + ?Sized,
        H: Heuristic<G>,
    {
        self.sync(graph);
        let i = v.index();
        if v != self.start {
            self.rhs[i] = graph
                .incident(v)
                .iter()
                .map(|&(u, e)| closed_plus(self.g[u.index()], graph.weight(e)))
                .fold(INFINITE_COST, f64::min);
        }
        if self.g[i] != self.rhs[i] {
            let key = self.calculate_key(graph, v);
            if self.queued[i] != Some(key) {
                self.queued[i] = Some(key);
                self.heap.push(Reverse((key, v)));
            }
        } else {
            self.queued[i] = None;
        }
    }

    /// An edge weight changed: re-examine both endpoints
    pub fn update_notify<G>(&mut self, graph: &G, e: EdgeId)
    where
        G: SearchGraph + ?Sized,
        H: Heuristic<G>,
    {
        let (u, v) = graph.endpoints(e);
        self.update_vertex(graph, u);
        self.update_vertex(graph, v);
    }

    /// Expand inconsistent vertices until the goal is settled; returns `g(goal)`
    pub fn compute_shortest_path<G>(&mut self, graph: &G) -> f64
    where
        G: SearchGraph + ?Sized,
        H: Heuristic<G>,
    {
        self.sync(graph);
        let goal = self.goal.index();
        if goal >= self.g.len() {
            return INFINITE_COST;
        }
        let expansions_before = self.expansions;
        loop {
            let (key, u) = match self.top() {
                Some(entry) => entry,
                None => break,
            };
            if key >= self.calculate_key(graph, self.goal) && self.rhs[goal] == self.g[goal] {
                break;
            }
            self.heap.pop();
            self.queued[u.index()] = None;
            self.expansions += 1;

            let i = u.index();
            if self.g[i] > self.rhs[i] {
                self.g[i] = self.rhs[i];
                tracing::trace!(vertex = i, g = self.g[i], "overconsistent vertex settled");
            } else {
                self.g[i] = INFINITE_COST;
                tracing::trace!(vertex = i, "underconsistent vertex reset");
                self.update_vertex(graph, u);
            }
            for &(s, _) in graph.incident(u) {
                self.update_vertex(graph, s);
            }
        }
        tracing::debug!(
            expansions = self.expansions - expansions_before,
            goal_cost = self.g[goal],
            "lpa* converged"
        );
        self.g[goal]
    }

    /// Walk back from the goal along best predecessors; `None` when the goal is unreachable
    pub fn extract_path<G>(&self, graph: &G) -> PlanningResult<Option<LazyPath>>
    where
        G: SearchGraph + ?Sized,
    {
        let cost = self.g(self.goal);
        if cost == INFINITE_COST {
            return Ok(None);
        }
        let n = graph.num_vertices();
        let mut visited = vec![false; n];
        let mut vertices = vec![self.goal];
        let mut edges = Vec::new();
        let mut v = self.goal;
        visited[v.index()] = true;
        while v != self.start {
            let best = graph
                .incident(v)
                .iter()
                .filter(|(u, _)| !visited[u.index()])
                .map(|&(u, e)| (closed_plus(self.g(u), graph.weight(e)), u, e))
                .filter(|(c, _, _)| *c != INFINITE_COST)
                .min_by_key(|&(c, u, _)| (OrderedFloat(c), u));
            match best {
                Some((_, u, e)) => {
                    visited[u.index()] = true;
                    vertices.push(u);
                    edges.push(e);
                    v = u;
                }
                None => {
                    return Err(PlanningError::PathReconstruction(format!(
                        "no finite predecessor for {} while walking back from {}",
                        v, self.goal
                    )));
                }
            }
        }
        vertices.reverse();
        edges.reverse();
        Ok(Some(LazyPath {
            vertices,
            edges,
            cost,
        }))
    }
}
