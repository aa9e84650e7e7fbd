// Lazy shortest path driver over roadmap, effort model and incremental search

pub mod driver;

pub use driver::*;
