// ABOUTME: Executors that carry out tmux operations
// The real executor spawns tmux against an isolated server; the dry-run one prints

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

use super::command::{shell_quote, TmuxOp};
use super::error::TmuxError;
use crate::environment::ResolvedSession;

/// Carries out one tmux operation and reports how the process exited.
#[cfg_attr(test, mockall::automock)]
pub trait Executor {
    /// Run `op`. `Err` means the process could not be started at all.
    fn execute(&mut self, op: &TmuxOp) -> std::io::Result<ExitStatus>;
}

/// Runs tmux on a server socket named after the session (`tmux -L <name>`),
/// so sessions with different names never share a server.
#[derive(Debug, Clone)]
pub struct TmuxExecutor {
    program: String,
    server: String,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl TmuxExecutor {
    /// Executor for `session`, running `program` as tmux.
    pub fn new(program: impl Into<String>, session: &ResolvedSession) -> Self {
        Self {
            program: program.into(),
            server: session.name.clone(),
            cwd: session.cwd_path().map(PathBuf::from),
            envs: session.env_overlay().to_vec(),
        }
    }

    /// Check that the tmux binary can be run at all.
    pub fn check_installed(&self) -> Result<(), TmuxError> {
        let output = Command::new(&self.program)
            .arg("-V")
            .output()
            .map_err(|_| TmuxError::TmuxNotInstalled)?;

        if !output.status.success() {
            return Err(TmuxError::TmuxNotInstalled);
        }
        debug!(
            "using {}",
            String::from_utf8_lossy(&output.stdout).trim_end()
        );
        Ok(())
    }

    /// Build the process for `op`: session cwd, session environment, inherited stdio.
    pub fn command(&self, op: &TmuxOp) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-L")
            .arg(&self.server)
            .args(op.args())
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl Executor for TmuxExecutor {
    fn execute(&mut self, op: &TmuxOp) -> std::io::Result<ExitStatus> {
        debug!("{}", render(&self.program, &self.server, op));
        self.command(op).status()
    }
}

/// Writes each operation as a shell command line instead of running it.
pub struct DryRunExecutor<W> {
    out: W,
    program: String,
    server: String,
}

impl<W: Write> DryRunExecutor<W> {
    /// Dry-run executor writing to `out`.
    pub fn new(out: W, program: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            out,
            program: program.into(),
            server: server.into(),
        }
    }

    /// The writer, for inspecting what was printed.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Executor for DryRunExecutor<W> {
    fn execute(&mut self, op: &TmuxOp) -> std::io::Result<ExitStatus> {
        writeln!(self.out, "{}", render(&self.program, &self.server, op))?;
        Ok(ExitStatus::default())
    }
}

/// Full command line for `op`, shell-quoted.
pub fn render(program: &str, server: &str, op: &TmuxOp) -> String {
    [program.to_string(), "-L".to_string(), server.to_string()]
        .into_iter()
        .chain(op.args())
        .map(|arg| shell_quote(&arg))
        .collect::<Vec<_>>()
        .join(" ")
}
