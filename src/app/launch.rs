// ABOUTME: A fully prepared session launch: resolved session, validated plan, setup decision

use anyhow::{Context, Result};
use std::io::Write;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitCode, ExitStatus};
use tracing::info;

use crate::environment::ResolvedSession;
use crate::setup::SetupRunner;
use crate::tmux::{DryRunExecutor, Executor, SessionPlan};

/// What preparing an invocation produced.
#[derive(Debug)]
pub enum Prepared {
    /// `--edit` was given; the file at this path was edited and nothing else runs.
    Edited(PathBuf),
    /// The session is ready to be materialized.
    Ready(Box<Launch>),
}

/// Everything needed to start one session.
#[derive(Debug, Clone)]
pub struct Launch {
    /// Session file the launch was loaded from.
    pub path: PathBuf,
    /// The session after environment expansion.
    pub session: ResolvedSession,
    /// Validated tmux operations.
    pub plan: SessionPlan,
    /// Whether the setup script runs before tmux.
    pub run_setup: bool,
}

impl Launch {
    /// Run the setup script if this launch calls for it.
    pub fn setup(&self, runner: &SetupRunner) -> Result<()> {
        let Some(script) = self.session.setup_script.as_deref().filter(|_| self.run_setup) else {
            return Ok(());
        };
        info!("Running setup script for session {}", self.session.name);
        runner
            .run(script)
            .context("failed to execute setup script")
    }

    /// Execute the plan; returns the status of the attach step.
    pub fn execute<E: Executor + ?Sized>(&self, executor: &mut E) -> Result<ExitStatus> {
        self.plan
            .execute(executor)
            .with_context(|| format!("failed to materialize session {:?}", self.session.name))
    }

    /// Print the plan as shell commands instead of running it.
    pub fn dry_run<W: Write>(&self, mut out: W, tmux: &str) -> Result<()> {
        if self.run_setup && self.session.setup_script.is_some() {
            writeln!(out, "# setup script would run first")?;
        }
        let mut executor = DryRunExecutor::new(out, tmux, &self.session.name);
        self.plan.execute(&mut executor)?;
        Ok(())
    }
}

/// Map a child's exit status to this process's exit code.
pub fn exit_code(status: ExitStatus) -> ExitCode {
    match (status.code(), status.signal()) {
        (Some(code), _) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        (None, Some(signal)) => ExitCode::from(u8::try_from(128 + signal).unwrap_or(1)),
        (None, None) => ExitCode::FAILURE,
    }
}
