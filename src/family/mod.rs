// Subset families, per-element evaluation records and the effort model

pub mod subsets;
pub mod evaluation;
pub mod effort_model;

pub use subsets::*;
pub use evaluation::*;
pub use effort_model::*;
