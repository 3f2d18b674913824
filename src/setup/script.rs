// ABOUTME: Runs the session's embedded setup script from a temporary executable file
// The file is removed again whether or not the script succeeds

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use nix::errno::Errno;
use thiserror::Error;
use tracing::{debug, info, warn};

const SCRIPT_PREFIX: &str = "tmuxg-setup";
const DEFAULT_INTERPRETER: &str = "#!/bin/sh";
const BUSY_RETRIES: u32 = 5;

/// Failures running a setup script.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The temporary file could not be created.
    #[error("failed to create temporary file for script")]
    TempFile(#[source] io::Error),

    /// The script body could not be written.
    #[error("failed to write temporary script file")]
    Write(#[source] io::Error),

    /// The file could not be made executable.
    #[error("failed to make temporary script executable")]
    Permissions(#[source] io::Error),

    /// The script could not be started.
    #[error("failed to start setup script")]
    Spawn(#[source] io::Error),

    /// The script ran and exited unsuccessfully.
    #[error("setup script exited with {0}")]
    Failed(ExitStatus),
}

/// Writes a script body to a private temporary file and executes it with the
/// session environment layered over the inherited one.
#[derive(Debug, Clone)]
pub struct SetupRunner {
    temp_dir: PathBuf,
    envs: Vec<(String, String)>,
}

impl SetupRunner {
    /// Runner passing `envs` to the script on top of the inherited environment.
    pub fn new(envs: &[(String, String)]) -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            envs: envs.to_vec(),
        }
    }

    /// Create the temporary script inside `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Run `body` once. An empty body is a no-op.
    pub fn run(&self, body: &str) -> Result<(), SetupError> {
        let body = body.trim();
        if body.is_empty() {
            return Ok(());
        }

        let mut file = tempfile::Builder::new()
            .prefix(SCRIPT_PREFIX)
            .tempfile_in(&self.temp_dir)
            .map_err(SetupError::TempFile)?;

        if !body.starts_with("#!") {
            writeln!(file, "{DEFAULT_INTERPRETER}").map_err(SetupError::Write)?;
        }
        writeln!(file, "{body}").map_err(SetupError::Write)?;
        file.flush().map_err(SetupError::Write)?;

        // Close our handle before exec; the path is still deleted on drop.
        let path = file.into_temp_path();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o700))
            .map_err(SetupError::Permissions)?;

        info!("Running setup script {}", path.display());
        let mut cmd = Command::new(&*path);
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = status_retrying_busy(&mut cmd).map_err(SetupError::Spawn);

        if let Err(err) = path.close() {
            warn!("Failed to remove temporary setup script: {}", err);
        }

        let status = status?;
        debug!("setup script finished with {}", status);
        if status.success() {
            Ok(())
        } else {
            Err(SetupError::Failed(status))
        }
    }
}

/// A freshly written executable can briefly report ETXTBSY while a forked
/// child elsewhere in the process still holds the write descriptor.
fn status_retrying_busy(cmd: &mut Command) -> io::Result<ExitStatus> {
    let mut attempts = 0;
    loop {
        match cmd.status() {
            Err(err) if err.raw_os_error() == Some(Errno::ETXTBSY as i32) && attempts < BUSY_RETRIES => {
                attempts += 1;
                thread::sleep(Duration::from_millis(20 * u64::from(attempts)));
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &TempDir) -> usize {
        fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn test_empty_script_is_noop() {
        let dir = TempDir::new().unwrap();
        let runner = SetupRunner::new(&[]).with_temp_dir(dir.path());

        runner.run("   \n").unwrap();
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn test_script_runs_and_is_removed() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let marker = out.path().join("ran");
        let runner = SetupRunner::new(&[("MARKER".to_string(), marker.display().to_string())])
            .with_temp_dir(dir.path());

        runner.run("echo hi > \"$MARKER\"").unwrap();

        assert_eq!(fs::read_to_string(&marker).unwrap(), "hi\n");
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn test_failing_script_is_reported_and_removed() {
        let dir = TempDir::new().unwrap();
        let runner = SetupRunner::new(&[]).with_temp_dir(dir.path());

        let err = runner.run("#!/bin/sh\nexit 3").unwrap_err();

        assert!(matches!(err, SetupError::Failed(status) if status.code() == Some(3)));
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn test_missing_temp_dir() {
        let dir = TempDir::new().unwrap();
        let runner = SetupRunner::new(&[]).with_temp_dir(dir.path().join("gone"));

        let err = runner.run("true").unwrap_err();
        assert!(matches!(err, SetupError::TempFile(_)));
    }
}
