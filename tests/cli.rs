//! End-to-end tests driving the `msh` binary.
//!
//! External commands fork and exec, so these run the real binary instead of
//! the library inside the test harness.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const ERROR: &str = "An error has occurred\n";

fn msh(args: &[&str], dir: &Path, stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_msh"))
        .args(args)
        .current_dir(dir)
        .env_remove("MSH_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn msh");
    // msh may exit before reading anything, which closes the pipe early.
    let _ = child.stdin.take().expect("stdin").write_all(stdin.as_bytes());
    child.wait_with_output().expect("wait msh")
}

/// Run `script` as a batch file inside `dir`.
fn batch(dir: &Path, script: &str) -> Output {
    let path = dir.join("script.msh");
    fs::write(&path, script).expect("write script");
    msh(&[path.to_str().unwrap()], dir, "")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn errors(out: &Output) -> usize {
    stderr(out).matches(ERROR).count()
}

// ============================================================================
// Invocation
// ============================================================================

#[test]
fn too_many_arguments_fail_without_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let out = msh(&["a.msh", "b.msh"], dir.path(), "exit\n");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out), ERROR);
    assert_eq!(stdout(&out), "");
}

#[test]
fn end_of_options_marker_counts_as_an_argument() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("s"), "echo ran-script\n").unwrap();
    let out = msh(&["--", "s"], dir.path(), "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out), ERROR);
    assert_eq!(stdout(&out), "");
}

#[test]
fn help_words_are_batch_file_names() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["--help", "help", "-x"] {
        fs::write(dir.path().join(name), format!("echo ran {}\n", name)).unwrap();
        let out = msh(&[name], dir.path(), "");
        assert_eq!(out.status.code(), Some(0), "msh {}", name);
        assert_eq!(stdout(&out), format!("ran {}\n", name));
        assert_eq!(stderr(&out), "");
    }
}

#[test]
fn option_like_missing_batch_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let out = msh(&["--help"], dir.path(), "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out), ERROR);
    assert_eq!(stdout(&out), "");
}

#[test]
fn unreadable_batch_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = msh(&["does-not-exist.msh"], dir.path(), "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out), ERROR);
}

#[test]
fn empty_batch_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out), "");
}

#[test]
fn batch_file_with_commands_succeeds_at_eof() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "echo hello world\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "hello world\n");
    assert_eq!(stderr(&out), "");
}

#[test]
fn batch_mode_prints_no_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "cd .\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(!stdout(&out).contains("msh> "));
}

// ============================================================================
// Interactive mode
// ============================================================================

#[test]
fn interactive_prompts_before_each_read() {
    let dir = tempfile::tempdir().unwrap();
    let out = msh(&[], dir.path(), "\nexit\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "msh> msh> ");
    assert_eq!(stderr(&out), "");
}

#[test]
fn interactive_end_of_input_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let out = msh(&[], dir.path(), "");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "msh> ");
}

// ============================================================================
// Built-ins
// ============================================================================

#[test]
fn exit_and_quit_with_arguments_keep_running() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "exit now\nquit 1\necho still here\nquit\necho unreachable\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(errors(&out), 2);
    assert_eq!(stdout(&out), "still here\n");
}

#[test]
fn exit_with_end_of_options_marker_keeps_running() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "exit --\nquit --help\necho still-running\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), ERROR.repeat(2));
    assert_eq!(stdout(&out), "still-running\n");
}

#[test]
fn cd_with_end_of_options_marker_is_two_arguments() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let out = batch(dir.path(), "cd -- sub\npwd\n");
    assert_eq!(stderr(&out), ERROR);
    let cwd = dir.path().canonicalize().unwrap();
    assert_eq!(stdout(&out).trim_end(), cwd.to_str().unwrap());
}

#[test]
fn cd_into_directory_named_help() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("help")).unwrap();
    let out = batch(dir.path(), "cd help\npwd\n");
    assert_eq!(stderr(&out), "");
    assert!(stdout(&out).trim_end().ends_with("/help"), "pwd said {:?}", stdout(&out));
}

#[test]
fn quit_without_arguments_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = msh(&[], dir.path(), "quit\necho unreachable\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "msh> ");
}

#[test]
fn cd_changes_directory_for_later_commands() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let out = batch(dir.path(), "cd sub\npwd > where.txt\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), "");
    let recorded = fs::read_to_string(dir.path().join("sub").join("where.txt")).unwrap();
    assert!(recorded.trim_end().ends_with("/sub"), "pwd said {:?}", recorded);
}

#[test]
fn cd_misuse_reports_same_error_each_time() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "cd\ncd a b\ncd /no/such/directory\npwd\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), ERROR.repeat(3));
    let cwd = dir.path().canonicalize().unwrap();
    assert_eq!(stdout(&out).trim_end(), cwd.to_str().unwrap());
}

// ============================================================================
// Tokenizing
// ============================================================================

#[test]
fn blank_lines_are_skipped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "\n   \n\t\t\n  echo   spaced\tout  \n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), "");
    assert_eq!(stdout(&out), "spaced out\n");
}

#[test]
fn tokens_past_the_limit_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "echo 1 2 3 4 5 6 7 8 9 10 11 12\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "1 2 3 4 5 6 7 8 9\n");
}

// ============================================================================
// Redirection
// ============================================================================

#[test]
fn redirect_captures_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("marker"), "").unwrap();
    let out = batch(dir.path(), "ls > out.txt\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), "");
    assert_eq!(stdout(&out), "");
    let listing = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(listing.lines().any(|l| l == "marker"), "got {:?}", listing);
}

#[test]
fn redirect_captures_stderr_too() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "ls /no/such/path/for/ls > out.txt\n");
    assert_eq!(stderr(&out), "");
    let captured = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(captured.contains("/no/such/path/for/ls"), "got {:?}", captured);
}

#[test]
fn redirect_truncates_and_sets_owner_only_mode() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");
    let out = batch(dir.path(), "echo first > out.txt\necho second > out.txt\n");
    assert_eq!(stderr(&out), "");
    assert_eq!(fs::read_to_string(&target).unwrap(), "second\n");
    let mode = fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn redirect_with_extra_token_does_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");
    fs::write(&target, "previous\n").unwrap();
    let out = batch(dir.path(), "ls > out.txt extra\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), ERROR);
    assert_eq!(stdout(&out), "");
    assert_eq!(fs::read_to_string(&target).unwrap(), "previous\n");
}

#[test]
fn redirect_without_target_does_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "echo lost >\necho kept\n");
    assert_eq!(errors(&out), 1);
    assert_eq!(stdout(&out), "kept\n");
}

// ============================================================================
// Launching
// ============================================================================

#[test]
fn missing_program_reports_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "no-such-program-anywhere\necho after\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), ERROR);
    assert_eq!(stdout(&out), "after\n");
}

#[test]
fn programs_in_current_directory_are_found() {
    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("local-tool");
    fs::write(&tool, "#!/bin/sh\necho local $1\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let out = batch(dir.path(), "local-tool ran\n");
    assert_eq!(stderr(&out), "");
    assert_eq!(stdout(&out), "local ran\n");
}

#[test]
fn child_exit_status_does_not_end_session() {
    let dir = tempfile::tempdir().unwrap();
    let out = batch(dir.path(), "false\necho next\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr(&out), "");
    assert_eq!(stdout(&out), "next\n");
}
