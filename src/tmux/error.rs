// ABOUTME: Error types for materializing a session on a tmux server
// Each failed step names what it was doing and carries the invocation failure

use std::process::ExitStatus;
use thiserror::Error;

/// Why a single tmux invocation failed.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// tmux could not be started.
    #[error("failed to run tmux: {0}")]
    Spawn(#[from] std::io::Error),

    /// tmux exited unsuccessfully.
    #[error("tmux exited with {0}")]
    Status(ExitStatus),
}

/// Failures materializing a session.
#[derive(Debug, Error)]
pub enum TmuxError {
    /// The session lists no windows; nothing is started.
    #[error("no windows configured for session {0:?}")]
    NoWindowsConfigured(String),

    /// The tmux binary could not be run.
    #[error("Tmux not installed on host")]
    TmuxNotInstalled,

    /// `new-session` failed.
    #[error("failed to start tmux session {session:?}")]
    SessionCreateFailed {
        /// Session name.
        session: String,
        /// How the invocation failed.
        #[source]
        source: InvocationError,
    },

    /// `set-environment` failed.
    #[error("failed to set environment variable {key:?}")]
    EnvironmentSetFailed {
        /// Variable name.
        key: String,
        /// How the invocation failed.
        #[source]
        source: InvocationError,
    },

    /// `new-window` failed.
    #[error("failed to create window {window:?}")]
    WindowCreateFailed {
        /// Window name.
        window: String,
        /// How the invocation failed.
        #[source]
        source: InvocationError,
    },

    /// `send-keys` failed.
    #[error("failed to send keystrokes to window {window:?}")]
    KeystrokeSendFailed {
        /// Window name.
        window: String,
        /// How the invocation failed.
        #[source]
        source: InvocationError,
    },

    /// `select-window` failed.
    #[error("failed to set window focus")]
    FocusFailed(#[source] InvocationError),

    /// `attach` could not be started.
    #[error("failed to attach to session {session:?}")]
    AttachFailed {
        /// Session name.
        session: String,
        /// Spawn error.
        #[source]
        source: std::io::Error,
    },
}
