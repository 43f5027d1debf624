mod solver_output;
mod wings;

// Re-export test fixtures
pub use solver_output::*;
pub use wings::*;
