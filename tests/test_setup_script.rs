// ABOUTME: Tests for running a session's setup script from a temporary file

use std::fs;
use tempfile::TempDir;
use tmuxg::setup::{SetupError, SetupRunner};

#[test]
fn test_echo_script_runs_and_leaves_nothing_behind() {
    let scratch = TempDir::new().unwrap();
    let runner = SetupRunner::new(&[]).with_temp_dir(scratch.path());

    runner.run("echo hi").unwrap();

    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_script_sees_session_environment() {
    let scratch = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let dir = target.path().join("src/project");
    let envs = vec![("PROJECT_DIR".to_string(), dir.display().to_string())];

    SetupRunner::new(&envs)
        .with_temp_dir(scratch.path())
        .run("#!/bin/sh\nset -e\nmkdir -p \"$PROJECT_DIR\"\n")
        .unwrap();

    assert!(dir.is_dir());
}

#[test]
fn test_failed_script_is_an_error_and_still_removed() {
    let scratch = TempDir::new().unwrap();
    let runner = SetupRunner::new(&[]).with_temp_dir(scratch.path());

    let err = runner.run("echo about to fail\nfalse").unwrap_err();

    assert!(matches!(err, SetupError::Failed(status) if !status.success()));
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_unknown_interpreter_fails_to_start() {
    let scratch = TempDir::new().unwrap();
    let runner = SetupRunner::new(&[]).with_temp_dir(scratch.path());

    let err = runner.run("#!/nonexistent/interpreter\necho hi").unwrap_err();

    assert!(matches!(err, SetupError::Spawn(_)));
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}
