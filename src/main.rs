// ABOUTME: Main entry point for the tmuxg command-line tool

//! `tmuxg` binary.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use tmuxg::app::App;
use tmuxg::cli::Cli;
use tmuxg::environment::Environment;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!("fatal: {:#}", err);
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let app = App::new(Environment::from_process())?;
    app.run(cli)
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_env("TMUXG_LOG")
                .unwrap_or_else(|_| cli.default_log_filter().into()),
        )
        .init();
}
