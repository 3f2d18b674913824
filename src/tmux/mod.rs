// ABOUTME: tmux session materialization
// Turns a resolved session into tmux operations and runs them on an isolated server

/// Typed tmux operations.
pub mod command;
/// tmux errors.
pub mod error;
/// Real and dry-run executors.
pub mod executor;
/// Session plans.
pub mod session;

pub use command::{TmuxOp, WindowTarget};
pub use error::{InvocationError, TmuxError};
pub use executor::{DryRunExecutor, Executor, TmuxExecutor};
pub use session::SessionPlan;
