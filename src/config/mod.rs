// ABOUTME: Session file lookup and loading
// Resolves a session name or path to a YAML document and decodes it

/// Config errors.
pub mod error;
/// Starter documents for new sessions.
pub mod template;

pub use error::ConfigError;
pub use template::{bootstrap, TemplateValues};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::environment::Environment;
use crate::models::SessionSpec;

/// Directory name under the config root that holds session files.
pub const APP_DIR: &str = "tmuxg";
/// Extension of session files in the config directory.
pub const SESSION_EXTENSION: &str = "yaml";

const RESERVED_NAME_CHARS: [char; 2] = ['.', ':'];

/// The per-user directory session files live in, `<config root>/tmuxg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDirs {
    root: PathBuf,
}

impl ConfigDirs {
    /// `$XDG_CONFIG_HOME/tmuxg`, else `$HOME/.config/tmuxg`.
    pub fn from_env(env: &Environment) -> Result<Self, ConfigError> {
        let base = env
            .non_empty("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env.non_empty("HOME").map(|home| Path::new(home).join(".config")))
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or(ConfigError::NoHomeDirectory)?;

        Ok(Self::with_root(base.join(APP_DIR)))
    }

    /// Use `root` directly as the session directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the session files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure(&self) -> Result<&Path, ConfigError> {
        fs::create_dir_all(&self.root).map_err(|source| ConfigError::ConfigDir {
            path: self.root.clone(),
            source,
        })?;
        Ok(&self.root)
    }

    /// Path of the session file for a bare name.
    pub fn session_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{SESSION_EXTENSION}"))
    }
}

/// Resolve `arg` to a session file.
///
/// An existing regular file is used as-is; anything else is treated as a
/// session name and looked up as `<name>.yaml` in the config directory.
pub fn locate(arg: &str, dirs: &ConfigDirs) -> Result<PathBuf, ConfigError> {
    let direct = Path::new(arg);
    match fs::metadata(direct) {
        Ok(meta) if meta.is_file() => {
            debug!("using session file {}", direct.display());
            return Ok(direct.to_path_buf());
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Inspect {
                path: direct.to_path_buf(),
                source,
            })
        }
    }

    dirs.ensure()?;
    let path = dirs.session_path(arg);
    match fs::metadata(&path) {
        Ok(_) => {
            debug!("using session file {}", path.display());
            Ok(path)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            name: arg.to_string(),
            path,
        }),
        Err(source) => Err(ConfigError::Inspect { path, source }),
    }
}

/// Session name for a file: its stem, with `.` and `:` replaced by `_`.
///
/// tmux uses both characters in window targets and rewrites them in session
/// names, so they never reach a session name.
pub fn session_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(RESERVED_NAME_CHARS, "_"))
}

/// Read and decode a session file, filling in defaults.
///
/// A document without a `name` takes the file stem as its session name.
pub fn load(path: &Path) -> Result<SessionSpec, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut spec = SessionSpec::from_yaml(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if spec.name.trim().is_empty() {
        if let Some(name) = session_name_for(path) {
            spec.name = name;
        }
    }
    if spec.name.contains(RESERVED_NAME_CHARS) {
        return Err(ConfigError::InvalidName {
            name: spec.name,
            path: path.to_path_buf(),
        });
    }

    debug!(
        "loaded session {} with {} window(s) from {}",
        spec.name,
        spec.windows.len(),
        path.display()
    );
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_dirs_prefer_xdg_config_home() {
        let env = Environment::from_vars([("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/ada")]);
        let dirs = ConfigDirs::from_env(&env).unwrap();
        assert_eq!(dirs.root(), Path::new("/xdg/tmuxg"));
        assert_eq!(dirs.session_path("foo"), PathBuf::from("/xdg/tmuxg/foo.yaml"));
    }

    #[test]
    fn test_dirs_fall_back_to_home() {
        let env = Environment::from_vars([("XDG_CONFIG_HOME", ""), ("HOME", "/home/ada")]);
        let dirs = ConfigDirs::from_env(&env).unwrap();
        assert_eq!(dirs.root(), Path::new("/home/ada/.config/tmuxg"));
    }

    #[test]
    fn test_load_names_session_after_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.yaml");
        fs::write(&path, "windows:\n  - name: main\n").unwrap();

        let spec = load(&path).unwrap();
        assert_eq!(spec.name, "notes");
        assert_eq!(spec.windows[0].command, "bash");
    }

    #[test]
    fn test_load_sanitizes_dotted_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("my.proj.yaml");
        fs::write(&path, "windows:\n  - name: main\n").unwrap();

        let spec = load(&path).unwrap();
        assert_eq!(spec.name, "my_proj");
    }

    #[test]
    fn test_load_rejects_reserved_characters_in_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("work.yaml");
        fs::write(&path, "name: a:b\nwindows:\n  - name: main\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName { ref name, .. } if name == "a:b"));
        assert!(err.to_string().contains("\"a:b\""));
    }

    #[test]
    fn test_load_parse_error_keeps_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "windows: {not: [a list}\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.ends_with("bad.yaml")));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
