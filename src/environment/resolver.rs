// ABOUTME: Resolves a session specification into concrete, fully expanded values
// Directories and commands are expanded against the session's environment context

use std::path::Path;

use super::Environment;
use crate::models::SessionSpec;

/// A window with its command and working directory expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    /// Position in the session, used as the tmux window index.
    pub index: usize,
    /// Window name as written in the session file.
    pub name: String,
    /// Expanded command.
    pub command: String,
    /// Expanded working directory, window override first.
    pub cwd: String,
    /// Keystroke tokens, sent verbatim.
    pub keystrokes: Vec<String>,
}

/// Session specification after environment expansion. Immutable from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// Session name, also the tmux server label.
    pub name: String,
    /// Expanded default working directory.
    pub cwd: String,
    /// Base environment plus the session's expanded entries.
    pub environment: Environment,
    /// Windows in tmux index order.
    pub windows: Vec<ResolvedWindow>,
    /// Index of the window to focus.
    pub focus: usize,
    /// Trimmed setup script body, if any.
    pub setup_script: Option<String>,
}

impl ResolvedSession {
    /// Session entries with expanded values, for tmux and child processes.
    pub fn env_overlay(&self) -> &[(String, String)] {
        self.environment.overlay()
    }

    /// Default working directory, `None` when the document leaves it empty.
    pub fn cwd_path(&self) -> Option<&Path> {
        if self.cwd.is_empty() {
            None
        } else {
            Some(Path::new(&self.cwd))
        }
    }
}

/// Expand every environment-bearing field of `spec` against `base`.
pub fn resolve(spec: &SessionSpec, base: &Environment) -> ResolvedSession {
    let environment = base.extend_expanded(&spec.environment);
    let cwd = environment.expand(&spec.cwd);

    let windows = spec
        .windows
        .iter()
        .enumerate()
        .map(|(index, window)| ResolvedWindow {
            index,
            name: window.name.clone(),
            command: environment.expand(&window.command),
            cwd: environment.expand(window.cwd_override().unwrap_or(&spec.cwd)),
            keystrokes: window.keystrokes.clone(),
        })
        .collect();

    tracing::debug!(session = %spec.name, cwd = %cwd, "resolved session environment");

    ResolvedSession {
        name: spec.name.clone(),
        cwd,
        focus: spec.focus_index(),
        setup_script: spec.setup_script().map(str::to_string),
        environment,
        windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WindowSpec;
    use pretty_assertions::assert_eq;

    fn spec() -> SessionSpec {
        let mut spec = SessionSpec {
            name: "blog".to_string(),
            cwd: "${GOPATH}/src/blog".to_string(),
            environment: [("GOPATH", "${HOME}/go")].into_iter().collect(),
            windows: vec![
                WindowSpec::new("editor", "$EDITOR ."),
                WindowSpec::new("shell", ""),
                WindowSpec {
                    cwd: "$HOME/tmp".to_string(),
                    ..WindowSpec::new("scratch", "ls ${GOPATH}")
                },
            ],
            focus: "shell".to_string(),
            ..SessionSpec::default()
        };
        spec.fill_defaults();
        spec
    }

    fn base() -> Environment {
        Environment::from_vars([("HOME", "/home/ada"), ("EDITOR", "nvim")])
    }

    #[test]
    fn test_session_cwd_uses_session_environment() {
        let resolved = resolve(&spec(), &base());
        assert_eq!(resolved.cwd, "/home/ada/go/src/blog");
        assert_eq!(resolved.cwd_path(), Some(Path::new("/home/ada/go/src/blog")));
    }

    #[test]
    fn test_windows_are_expanded_in_order() {
        let resolved = resolve(&spec(), &base());

        let summary: Vec<_> = resolved
            .windows
            .iter()
            .map(|w| (w.index, w.name.as_str(), w.command.as_str(), w.cwd.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (0, "editor", "nvim .", "/home/ada/go/src/blog"),
                (1, "shell", "bash", "/home/ada/go/src/blog"),
                (2, "scratch", "ls /home/ada/go", "/home/ada/tmp"),
            ]
        );
    }

    #[test]
    fn test_environment_overlay_holds_expanded_values() {
        let resolved = resolve(&spec(), &base());
        assert_eq!(
            resolved.env_overlay(),
            &[("GOPATH".to_string(), "/home/ada/go".to_string())]
        );
    }

    #[test]
    fn test_focus_and_setup_script() {
        let mut spec = spec();
        spec.setup_script = "\nmkdir -p $GOPATH\n".to_string();

        let resolved = resolve(&spec, &base());
        assert_eq!(resolved.focus, 1);
        // the script body is left for the shell to expand
        assert_eq!(resolved.setup_script.as_deref(), Some("mkdir -p $GOPATH"));
    }

    #[test]
    fn test_empty_cwd_has_no_path() {
        let mut spec = spec();
        spec.cwd = String::new();
        let resolved = resolve(&spec, &base());
        assert_eq!(resolved.cwd_path(), None);
    }
}
