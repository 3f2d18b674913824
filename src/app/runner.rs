// ABOUTME: Drives one tmuxg invocation: locate or bootstrap the session file, resolve it,
// decide on the setup script, then hand the plan to tmux

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use super::launch::{exit_code, Launch, Prepared};
use crate::cli::Cli;
use crate::config::{self, template, ConfigDirs, ConfigError, TemplateValues};
use crate::environment::{resolve, Environment};
use crate::setup::SetupRunner;
use crate::tmux::{SessionPlan, TmuxExecutor};

/// One tmuxg invocation bound to an environment and a config directory.
pub struct App {
    env: Environment,
    dirs: ConfigDirs,
}

impl App {
    /// App reading its configuration root from `env`.
    pub fn new(env: Environment) -> Result<Self> {
        let dirs = ConfigDirs::from_env(&env).context("failed to locate config directory")?;
        Ok(Self { env, dirs })
    }

    /// App with an explicit config directory.
    pub const fn with_dirs(env: Environment, dirs: ConfigDirs) -> Self {
        Self { env, dirs }
    }

    /// Config directory session files are looked up in.
    pub const fn dirs(&self) -> &ConfigDirs {
        &self.dirs
    }

    /// Full invocation: prepare, then dry-run or run setup and tmux.
    pub fn run(&self, cli: &Cli) -> Result<ExitCode> {
        let launch = match self.prepare(cli)? {
            Prepared::Edited(path) => {
                info!("Edited {}", path.display());
                return Ok(ExitCode::SUCCESS);
            }
            Prepared::Ready(launch) => launch,
        };

        if cli.dry_run {
            launch.dry_run(io::stdout().lock(), &cli.tmux)?;
            return Ok(ExitCode::SUCCESS);
        }

        launch.setup(&SetupRunner::new(launch.session.env_overlay()))?;

        let mut executor = TmuxExecutor::new(&cli.tmux, &launch.session);
        executor.check_installed()?;
        let status = launch.execute(&mut executor)?;
        debug!("tmux attach finished with {}", status);
        Ok(exit_code(status))
    }

    /// Everything up to the first side effect on tmux: find (or create and
    /// edit) the session file, load and resolve it, validate the plan and
    /// decide whether the setup script runs.
    pub fn prepare(&self, cli: &Cli) -> Result<Prepared> {
        let (path, bootstrapped) = match config::locate(&cli.session, &self.dirs) {
            Ok(path) if !cli.edit => (path, false),
            Ok(path) | Err(ConfigError::NotFound { path, .. }) => {
                self.edit_session(cli, &path)?;
                (path, true)
            }
            Err(err) => return Err(err).context("failed to find session file"),
        };

        if cli.edit {
            return Ok(Prepared::Edited(path));
        }

        let spec = config::load(&path)?;
        let session = resolve(&spec, &self.env);
        let plan = SessionPlan::build(&session)?;

        let cwd_missing = session.cwd_path().is_some_and(|cwd| !cwd.exists());
        let run_setup = session.setup_script.is_some() && (cli.setup || bootstrapped || cwd_missing);
        debug!(
            "setup script: present={} forced={} bootstrapped={} cwd_missing={}",
            session.setup_script.is_some(),
            cli.setup,
            bootstrapped,
            cwd_missing
        );

        Ok(Prepared::Ready(Box::new(Launch {
            path,
            session,
            plan,
            run_setup,
        })))
    }

    fn edit_session(&self, cli: &Cli, path: &Path) -> Result<()> {
        let name = config::session_name_for(path).unwrap_or_else(|| cli.session.clone());
        let values = TemplateValues::new(&name, cli.user.clone(), cli.project.clone(), &self.env);
        let editor = template::editor_command(&self.env);

        config::bootstrap(path, &values, &editor)
            .with_context(|| format!("failed to set up session file {}", path.display()))
    }

    /// Path a bare session name resolves to.
    pub fn session_path(&self, name: &str) -> PathBuf {
        self.dirs.session_path(name)
    }
}
