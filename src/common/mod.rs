//! Common types, traits, and error definitions for lazy_roadmap
//!
//! This module provides the foundational building blocks shared by
//! the roadmap, family, search and lazy evaluation modules.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
