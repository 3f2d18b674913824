// ABOUTME: Application driver: one invocation from session argument to attached tmux session

/// Prepared launches and their execution.
pub mod launch;
/// The invocation driver.
pub mod runner;

pub use launch::{exit_code, Launch, Prepared};
pub use runner::App;
