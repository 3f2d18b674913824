// ABOUTME: Session materialization: builds the ordered tmux operation plan and runs it
// The plan is validated up front, so a bad session never reaches tmux

use std::process::ExitStatus;
use tracing::{debug, info};

use super::command::{TmuxOp, WindowTarget};
use super::error::{InvocationError, TmuxError};
use super::executor::Executor;
use crate::environment::ResolvedSession;

/// Ordered tmux operations that recreate one session.
///
/// Order is fixed: create the session running window 0, push the session
/// environment, create windows 1.. in order, send keystrokes, select the
/// focused window, attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    session: String,
    ops: Vec<TmuxOp>,
}

impl SessionPlan {
    /// Plan for `session`; fails when it has no windows.
    pub fn build(session: &ResolvedSession) -> Result<Self, TmuxError> {
        let Some(first) = session.windows.first() else {
            return Err(TmuxError::NoWindowsConfigured(session.name.clone()));
        };
        let name = &session.name;
        let target = |index| WindowTarget::new(name.clone(), index);

        let mut ops = vec![TmuxOp::CreateSession {
            session: name.clone(),
            cwd: first.cwd.clone(),
            command: first.command.clone(),
        }];

        ops.extend(
            session
                .env_overlay()
                .iter()
                .map(|(key, value)| TmuxOp::SetEnvironment {
                    session: name.clone(),
                    key: key.clone(),
                    value: value.clone(),
                }),
        );

        ops.extend(session.windows.iter().skip(1).map(|w| TmuxOp::CreateWindow {
            target: target(w.index),
            window: w.name.clone(),
            cwd: w.cwd.clone(),
            command: w.command.clone(),
        }));

        ops.extend(
            session
                .windows
                .iter()
                .filter(|w| !w.keystrokes.is_empty())
                .map(|w| TmuxOp::SendKeys {
                    target: target(w.index),
                    window: w.name.clone(),
                    keys: w.keystrokes.clone(),
                }),
        );

        ops.push(TmuxOp::SelectWindow {
            target: target(session.focus),
        });
        ops.push(TmuxOp::Attach {
            session: name.clone(),
        });

        Ok(Self {
            session: name.clone(),
            ops,
        })
    }

    /// Name of the session the plan creates.
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Operations in execution order.
    pub fn ops(&self) -> &[TmuxOp] {
        &self.ops
    }

    /// Run every operation in order, stopping at the first failure.
    ///
    /// Returns the exit status of the attach step, which lasts as long as the
    /// interactive session.
    pub fn execute<E: Executor + ?Sized>(&self, executor: &mut E) -> Result<ExitStatus, TmuxError> {
        info!("Materializing tmux session {} ({} steps)", self.session, self.ops.len());

        for op in &self.ops {
            let result = executor.execute(op);

            if let TmuxOp::Attach { session } = op {
                return result.map_err(|source| TmuxError::AttachFailed {
                    session: session.clone(),
                    source,
                });
            }

            let failure = match result {
                Ok(status) if status.success() => continue,
                Ok(status) => InvocationError::Status(status),
                Err(err) => InvocationError::Spawn(err),
            };
            debug!("tmux step failed: {:?}", op);
            return Err(step_error(op, failure));
        }

        Ok(ExitStatus::default())
    }
}

fn step_error(op: &TmuxOp, source: InvocationError) -> TmuxError {
    match op {
        TmuxOp::CreateSession { session, .. } => TmuxError::SessionCreateFailed {
            session: session.clone(),
            source,
        },
        TmuxOp::SetEnvironment { key, .. } => TmuxError::EnvironmentSetFailed {
            key: key.clone(),
            source,
        },
        TmuxOp::CreateWindow { window, .. } => TmuxError::WindowCreateFailed {
            window: window.clone(),
            source,
        },
        TmuxOp::SendKeys { window, .. } => TmuxError::KeystrokeSendFailed {
            window: window.clone(),
            source,
        },
        TmuxOp::SelectWindow { .. } => TmuxError::FocusFailed(source),
        TmuxOp::Attach { session } => TmuxError::AttachFailed {
            session: session.clone(),
            source: std::io::Error::other(source),
        },
    }
}
