//! lazy_roadmap - lazy shortest paths over densifying roadmaps
//!
//! This crate builds batch-densified Halton roadmaps, orders feasibility
//! checks over families of nested subsets, and certifies shortest paths
//! with as few checks as possible using Lifelong Planning A*.

// Core modules
pub mod common;
pub mod sampling;

// Planning modules
pub mod roadmap;
pub mod family;
pub mod search;
pub mod lazysp;

// Re-export common types for convenience
pub use common::{Element, Feasibility, LazyPath, PathElement, State, VertexId, EdgeId, SubsetId};
pub use common::{FeasibilityOracle, LazyWeights, NearestNeighborIndex, RoadmapStrategy, RoadmapTopology, SearchGraph};
pub use common::{OracleError, PlanningError, PlanningResult, INFINITE_COST};
pub use lazysp::{LazySp, LazySpConfig, PathOutcome};
