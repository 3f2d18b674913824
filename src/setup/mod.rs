// ABOUTME: One-shot setup script support for preparing a session's working directory

/// Temporary-file script execution.
pub mod script;

pub use script::{SetupError, SetupRunner};
