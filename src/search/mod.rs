// Incremental shortest-path search

pub mod heuristic;
pub mod lpa_star;

pub use heuristic::*;
pub use lpa_star::*;
