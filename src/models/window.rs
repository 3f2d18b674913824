// ABOUTME: Window specification model for a single tmux window in a session file

use serde::Deserialize;

use super::session::null_as_default;

/// Command run in a window that does not name one.
pub const DEFAULT_WINDOW_COMMAND: &str = "bash";

/// One window of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    /// Window name, matched by `focus`.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Command the window runs; `bash` when empty.
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    /// Working directory overriding the session's, unexpanded.
    #[serde(deserialize_with = "null_as_default")]
    pub cwd: String,
    /// tmux key tokens, passed to send-keys untouched
    #[serde(deserialize_with = "null_as_default")]
    pub keystrokes: Vec<String>,
}

impl WindowSpec {
    /// Window with no cwd override and no keystrokes.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            ..Self::default()
        }
    }

    /// Fill in the default command.
    pub fn fill_defaults(&mut self) {
        if self.command.trim().is_empty() {
            self.command = DEFAULT_WINDOW_COMMAND.to_string();
        }
    }

    /// Working directory override, `None` when the session default applies.
    pub fn cwd_override(&self) -> Option<&str> {
        if self.cwd.is_empty() {
            None
        } else {
            Some(&self.cwd)
        }
    }
}
