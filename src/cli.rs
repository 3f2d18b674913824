// ABOUTME: Command-line arguments for the tmuxg binary

use clap::{ArgAction, Parser};

/// Provision a tmux session from a YAML session file
#[derive(Debug, Clone, Parser)]
#[command(name = "tmuxg", version)]
pub struct Cli {
    /// Session name (looked up in the config directory) or path to a session file
    pub session: String,

    /// Create the session file if needed, open it in your editor, then exit
    #[arg(long)]
    pub edit: bool,

    /// Run the session's setup script even if its working directory exists
    #[arg(long)]
    pub setup: bool,

    /// Default user for a new session file (defaults to $USER)
    #[arg(long)]
    pub user: Option<String>,

    /// Default project for a new session file (defaults to the session name)
    #[arg(long)]
    pub project: Option<String>,

    /// Print the tmux commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// tmux binary to run
    #[arg(long, env = "TMUXG_TMUX", default_value = "tmux")]
    pub tmux: String,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter used when `TMUXG_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "tmuxg=warn",
            1 => "tmuxg=info",
            _ => "tmuxg=debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["tmuxg", "blog"]).unwrap();
        assert_eq!(cli.session, "blog");
        assert!(!cli.edit && !cli.setup && !cli.dry_run);
        assert_eq!(cli.user, None);
        assert_eq!(cli.default_log_filter(), "tmuxg=warn");
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "tmuxg", "--edit", "--setup", "--user", "ada", "--project", "site", "--dry-run",
            "--tmux", "/opt/tmux", "-vv", "blog",
        ])
        .unwrap();
        assert!(cli.edit && cli.setup && cli.dry_run);
        assert_eq!(cli.user.as_deref(), Some("ada"));
        assert_eq!(cli.project.as_deref(), Some("site"));
        assert_eq!(cli.tmux, "/opt/tmux");
        assert_eq!(cli.default_log_filter(), "tmuxg=debug");
    }

    #[test]
    fn test_session_is_required() {
        assert!(Cli::try_parse_from(["tmuxg"]).is_err());
    }
}
