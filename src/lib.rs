// ABOUTME: Library crate for tmuxg exposing session loading, resolution and tmux materialization

//! Provision tmux sessions from declarative YAML session files.

/// Invocation driver.
pub mod app;
/// Command-line interface.
pub mod cli;
/// Session file lookup, loading and bootstrapping.
pub mod config;
/// Environment context and session resolution.
pub mod environment;
/// Session file data model.
pub mod models;
/// Setup script runner.
pub mod setup;
/// tmux plans and executors.
pub mod tmux;
