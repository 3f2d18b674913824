// ABOUTME: Typed tmux operations that make up a session materialization plan
// Each operation renders to the exact tmux argument list it stands for

use std::fmt;

/// Positional window address, rendered as `<session>:<index>`.
///
/// Windows are identified by position only; tmux window names play no part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTarget {
    /// Session name.
    pub session: String,
    /// Zero-based window index.
    pub index: usize,
}

impl WindowTarget {
    /// Target for window `index` of `session`.
    pub fn new(session: impl Into<String>, index: usize) -> Self {
        Self {
            session: session.into(),
            index,
        }
    }
}

impl fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session, self.index)
    }
}

/// One tmux invocation in a session plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxOp {
    /// `new-session`, detached, running window 0's command in window 0's cwd.
    CreateSession {
        /// Session name.
        session: String,
        /// Working directory of window 0; empty for none.
        cwd: String,
        /// Command run in window 0.
        command: String,
    },
    /// `set-environment` scoped to the session.
    SetEnvironment {
        /// Session name.
        session: String,
        /// Variable name.
        key: String,
        /// Expanded value.
        value: String,
    },
    /// `new-window` at a fixed position.
    CreateWindow {
        /// Where the window is created.
        target: WindowTarget,
        /// Window name, used in error messages only.
        window: String,
        /// Working directory; empty for none.
        cwd: String,
        /// Command run in the window.
        command: String,
    },
    /// `send-keys`, tokens passed through untouched.
    SendKeys {
        /// Window receiving the keys.
        target: WindowTarget,
        /// Window name, used in error messages only.
        window: String,
        /// Key tokens.
        keys: Vec<String>,
    },
    /// `select-window` on the focused window.
    SelectWindow {
        /// Window to focus.
        target: WindowTarget,
    },
    /// `attach`; runs for as long as the user stays in the session.
    Attach {
        /// Session name.
        session: String,
    },
}

impl TmuxOp {
    /// tmux arguments for this operation, not including the server selection.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            Self::CreateSession {
                session,
                cwd,
                command,
            } => {
                args.extend(["new-session", "-d", "-s"].map(String::from));
                args.push(session.clone());
                push_cwd(&mut args, cwd);
                args.push(command.clone());
            }
            Self::SetEnvironment {
                session,
                key,
                value,
            } => {
                args.extend(["set-environment", "-t"].map(String::from));
                args.extend([session.clone(), key.clone(), value.clone()]);
            }
            Self::CreateWindow {
                target,
                cwd,
                command,
                ..
            } => {
                args.extend(["new-window", "-d", "-t"].map(String::from));
                args.push(target.to_string());
                push_cwd(&mut args, cwd);
                args.push(command.clone());
            }
            Self::SendKeys { target, keys, .. } => {
                args.extend(["send-keys", "-t"].map(String::from));
                args.push(target.to_string());
                args.extend(keys.iter().cloned());
            }
            Self::SelectWindow { target } => {
                args.extend(["select-window", "-t"].map(String::from));
                args.push(target.to_string());
            }
            Self::Attach { session } => {
                args.extend(["attach", "-t"].map(String::from));
                args.push(session.clone());
            }
        }
        args
    }

    /// Whether this is the final, interactive attach step.
    pub const fn is_attach(&self) -> bool {
        matches!(self, Self::Attach { .. })
    }
}

fn push_cwd(args: &mut Vec<String>, cwd: &str) {
    if !cwd.is_empty() {
        args.push("-c".to_string());
        args.push(cwd.to_string());
    }
}

/// Quote `arg` for display in a POSIX shell command line.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_target_format() {
        assert_eq!(WindowTarget::new("blog", 2).to_string(), "blog:2");
    }

    #[test]
    fn test_create_session_args() {
        let op = TmuxOp::CreateSession {
            session: "blog".to_string(),
            cwd: "/srv/blog".to_string(),
            command: "vim .".to_string(),
        };
        assert_eq!(
            op.args(),
            vec!["new-session", "-d", "-s", "blog", "-c", "/srv/blog", "vim ."]
        );

        let op = TmuxOp::CreateSession {
            session: "blog".to_string(),
            cwd: String::new(),
            command: "vim .".to_string(),
        };
        assert_eq!(op.args(), vec!["new-session", "-d", "-s", "blog", "vim ."]);
    }

    #[test]
    fn test_create_window_args() {
        let op = TmuxOp::CreateWindow {
            target: WindowTarget::new("blog", 1),
            window: "shell".to_string(),
            cwd: "/srv/blog".to_string(),
            command: "bash".to_string(),
        };
        assert_eq!(
            op.args(),
            vec!["new-window", "-d", "-t", "blog:1", "-c", "/srv/blog", "bash"]
        );
    }

    #[test]
    fn test_create_window_without_cwd_omits_flag() {
        let op = TmuxOp::CreateWindow {
            target: WindowTarget::new("blog", 1),
            window: "shell".to_string(),
            cwd: String::new(),
            command: "bash".to_string(),
        };
        assert_eq!(op.args(), vec!["new-window", "-d", "-t", "blog:1", "bash"]);
    }

    #[test]
    fn test_send_keys_passes_tokens_verbatim() {
        let op = TmuxOp::SendKeys {
            target: WindowTarget::new("blog", 0),
            window: "editor".to_string(),
            keys: vec![":e $HOME".to_string(), "C-m".to_string(), "\\n".to_string()],
        };
        assert_eq!(
            op.args(),
            vec!["send-keys", "-t", "blog:0", ":e $HOME", "C-m", "\\n"]
        );
    }

    #[test]
    fn test_select_and_attach_args() {
        let select = TmuxOp::SelectWindow {
            target: WindowTarget::new("blog", 2),
        };
        let attach = TmuxOp::Attach {
            session: "blog".to_string(),
        };
        assert_eq!(select.args(), vec!["select-window", "-t", "blog:2"]);
        assert_eq!(attach.args(), vec!["attach", "-t", "blog"]);
        assert!(attach.is_attach());
        assert!(!select.is_attach());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("blog:1"), "blog:1");
        assert_eq!(shell_quote("vim ."), "'vim .'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
