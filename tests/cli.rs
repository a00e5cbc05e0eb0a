//! End-to-end tests through the `tuxsh` binary: JSON line on stdin, status out.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_json(json: &str) -> Output {
    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_tuxsh"))
        // Keep any user config overlay out of the way.
        .env("HOME", home.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tuxsh");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(json.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn status_of(json: &str) -> i32 {
    run_json(json).status.code().expect("tuxsh exited normally")
}

macro_rules! exit_test {
    ($name:ident, $json:expr, $status:expr) => {
        #[test]
        fn $name() {
            assert_eq!(status_of($json), $status, "input: {}", $json);
        }
    };
}

// ── exit builtin terminates the shell ──

exit_test!(exit_without_arguments, r#"[{"argv": ["exit"]}]"#, 0);
exit_test!(exit_with_code, r#"[{"argv": ["exit", "7"]}]"#, 7);
exit_test!(exit_wraps_modulo_256, r#"[{"argv": ["exit", "300"]}]"#, 44);
exit_test!(exit_non_numeric, r#"[{"argv": ["exit", "abc"]}]"#, 2);
exit_test!(
    exit_stops_the_rest_of_the_line,
    r#"[{"argv": ["exit", "7"]}, {"argv": ["sh", "-c", "exit 9"]}]"#,
    7
);
exit_test!(
    exit_syntax_error_continues,
    r#"[{"argv": ["exit", "1", "2"]}, {"argv": ["sh", "-c", "exit 9"]}]"#,
    9
);
exit_test!(
    exit_in_pipeline_keeps_shell,
    r#"[{"argv": ["exit", "7"], "op": "pipe"}, {"argv": ["sh", "-c", "cat; exit 4"]}]"#,
    4
);

// ── Line status ──

exit_test!(empty_input_runs_nothing, "", 0);
exit_test!(empty_line, "[]", 0);
exit_test!(
    line_status_is_process_status,
    r#"[{"argv": ["true"], "op": "and"}, {"argv": ["sh", "-c", "exit 12"]}]"#,
    12
);
exit_test!(
    subshell_collapses_status,
    r#"[{"subshell": [{"argv": ["sh", "-c", "exit 12"]}]}]"#,
    5
);

#[test]
fn invalid_json_is_rejected() {
    let output = run_json("{not json");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("JSON parse error"), "stderr: {stderr}");
}

#[test]
fn pipeline_output_reaches_stdout() {
    let output = run_json(
        r#"[{"argv": ["echo", "hello"], "op": "pipe"}, {"argv": ["tr", "a-z", "A-Z"]}]"#,
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "HELLO\n");
}

#[test]
fn builtin_output_appears_once() {
    let output = run_json(r#"[{"argv": ["help"]}]"#);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        tuxsh::builtins::help::HELP_TEXT
    );
}

#[test]
fn cd_then_pwd_in_the_same_line() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().canonicalize().unwrap();
    let json = serde_json::json!([
        {"argv": ["cd", target.display().to_string()]},
        {"argv": ["pwd"]},
    ])
    .to_string();
    let output = run_json(&json);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}\n", target.display())
    );
}

#[test]
fn missing_program_is_reported() {
    let output = run_json(r#"[{"argv": ["tuxsh-definitely-not-installed"]}]"#);
    assert_eq!(output.status.code(), Some(127));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("tuxsh-definitely-not-installed"),
        "stderr: {stderr}"
    );
}

#[test]
fn cd_syntax_error_is_reported_once() {
    let output = run_json(r#"[{"argv": ["cd"]}]"#);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("cd: ").count(), 1, "stderr: {stderr}");
}
