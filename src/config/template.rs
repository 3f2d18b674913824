// ABOUTME: Creates a starter session file from a template and opens it in an editor
// Used when a session name has no file yet, or when editing is requested

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{info, warn};

use super::{load, ConfigError};
use crate::environment::Environment;

const FALLBACK_EDITOR: &str = "vim";

const NEW_SESSION_TEMPLATE: &str = r#"
# Name of the session. Probably don't mess with this.
name: "{{name}}"

# Environment variables set for the tmux session.
environment:
  GOPATH: "${HOME}/go/{{name}}"

# Current working directory for the tmux session. May use environment variables
# declared above. A window may override it with its own cwd.
cwd: "${GOPATH}/src/github.com/{{user}}/{{project}}"

# Script to run the first time this session starts, or when specifically
# invoked with --setup. Try to make this script idempotent.
setup-script: |
    #!/bin/bash
    mkdir -p ${GOPATH}
    go get -d github.com/{{script:user}}/{{script:project}}/...

# Windows to create in the tmux session and what to run in each.
windows:
  - name: editor
    command: vim
    keystrokes:
      - \n
  - name: shell
focus: editor
"#;

/// Values substituted into the new-session template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValues {
    /// Session name, the stem of the file being created.
    pub name: String,
    /// Owner used in the example `cwd` and setup script.
    pub user: String,
    /// Project used in the example `cwd` and setup script.
    pub project: String,
}

impl TemplateValues {
    /// Fill unset values: user from `$USER` or the login name, project from the name.
    pub fn new(name: &str, user: Option<String>, project: Option<String>, env: &Environment) -> Self {
        let user = user
            .filter(|u| !u.is_empty())
            .or_else(|| env.non_empty("USER").map(str::to_string))
            .or_else(login_name)
            .unwrap_or_default();
        let project = project
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| name.to_string());

        Self {
            name: name.to_string(),
            user,
            project,
        }
    }

    /// The starter document with every placeholder filled in.
    ///
    /// Values land inside double-quoted scalars, or on a single line of the
    /// setup-script block, so any text keeps the document loadable.
    pub fn render(&self) -> String {
        let mut out = NEW_SESSION_TEMPLATE.trim_start().to_string();
        for (key, value) in [
            ("name", &self.name),
            ("user", &self.user),
            ("project", &self.project),
        ] {
            let line = one_line(value);
            out = out
                .replace(&format!("{{{{script:{key}}}}}"), &line)
                .replace(&format!("{{{{{key}}}}}"), &double_quoted(&line));
        }
        out
    }
}

fn one_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Escape `value` for use inside a YAML double-quoted scalar.
fn double_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn login_name() -> Option<String> {
    nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|user| user.name)
}

/// Editor command line from `$VISUAL` or `$EDITOR`, defaulting to vim.
pub fn editor_command(env: &Environment) -> String {
    env.non_empty("VISUAL")
        .or_else(|| env.non_empty("EDITOR"))
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

/// Open `path` in `editor` (split on whitespace) and wait for it to exit.
pub fn edit(editor: &str, path: &Path) -> Result<(), ConfigError> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(FALLBACK_EDITOR);

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| ConfigError::Editor {
            editor: editor.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ConfigError::Editor {
            editor: editor.to_string(),
            source: io::Error::other(format!("editor exited with {status}")),
        })
    }
}

/// Write the template to `path` if nothing is there yet, let the user edit
/// it, and check that the result still loads.
///
/// A file created here is removed again if editing or validation fails.
pub fn bootstrap(path: &Path, values: &TemplateValues, editor: &str) -> Result<(), ConfigError> {
    let created = !path.exists();
    if created {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::ConfigDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        info!("Creating session file {}", path.display());
        fs::write(path, values.render()).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let result = edit(editor, path).and_then(|()| load(path).map(drop));
    if result.is_err() && created {
        if let Err(err) = fs::remove_file(path) {
            warn!("Failed to remove {}: {}", path.display(), err);
        }
    }
    result
}
