// ABOUTME: Error types for locating, reading and bootstrapping session files

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures locating, reading or creating a session file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file for a session name. `path` is where it was looked for.
    #[error("session {name:?} not found (looked for {})", .path.display())]
    NotFound {
        /// The argument that was looked up.
        name: String,
        /// Expected location of the session file.
        path: PathBuf,
    },

    /// Neither `$XDG_CONFIG_HOME` nor a home directory is available.
    #[error("could not determine the home directory")]
    NoHomeDirectory,

    /// The config directory could not be created.
    #[error("failed to create config directory {}", .path.display())]
    ConfigDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A metadata lookup failed for a reason other than "not found".
    #[error("failed to resolve session file {}", .path.display())]
    Inspect {
        /// Path that was inspected.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The session file could not be read.
    #[error("failed to read session file {}", .path.display())]
    Read {
        /// Session file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The session file is not a valid session document.
    #[error("failed to parse session file {}", .path.display())]
    Parse {
        /// Session file.
        path: PathBuf,
        /// Decoder error, with its location in the document.
        #[source]
        source: serde_yaml::Error,
    },

    /// A new session file could not be written.
    #[error("failed to write config file {}", .path.display())]
    Write {
        /// Session file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The session name contains a character tmux reserves.
    #[error("invalid session name {name:?} in {}: '.' and ':' are not allowed", .path.display())]
    InvalidName {
        /// Offending name.
        name: String,
        /// Session file it came from.
        path: PathBuf,
    },

    /// The editor could not be started or exited unsuccessfully.
    #[error("editor {editor:?} exited with error")]
    Editor {
        /// Editor command line as configured.
        editor: String,
        /// Spawn error, or the editor's exit status.
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Whether the session file simply does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
