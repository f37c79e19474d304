mod error;
mod execution;
pub mod path;
mod spawn;
mod state;
mod wait;

// Re-export the public surface so that callers use `engine::execute`,
// `engine::ShellState`, etc.
pub use execution::execute;
pub use state::{ExecutionOutcome, ShellState};
