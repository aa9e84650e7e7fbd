// Deterministic sampling: Halton sequences and seeded offsets

pub mod halton;
pub mod seeded;

pub use halton::*;
pub use seeded::*;
