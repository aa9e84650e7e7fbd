// Roadmap construction: domains, graph storage, neighbor queries and growth strategies

pub mod domain;
pub mod graph;
pub mod nearest_neighbors;
pub mod halton_dens;
pub mod builder;

pub use domain::*;
pub use graph::*;
pub use nearest_neighbors::*;
pub use halton_dens::*;
pub use builder::*;
