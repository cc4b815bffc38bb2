//! Exit codes: 0 on success, 2 on any error, with messages on stderr only.

use nekomemo_cli::run;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(args, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn successful_commands_return_zero() {
    assert_eq!(run_cli(&["nekomemo", "levels"]).0, 0);
    assert_eq!(run_cli(&["nekomemo", "prices"]).0, 0);
}

#[test]
fn invalid_level_returns_two() {
    let (code, stdout, stderr) = run_cli(&["nekomemo", "sim", "--level", "200", "--bot", "perfect"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid level id: 200"));
    assert!(!stdout.contains("Session"));
}

#[test]
fn unknown_bot_returns_two() {
    let (code, _, stderr) = run_cli(&["nekomemo", "sim", "--level", "0", "--bot", "oracle"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown bot: oracle"));
}

#[test]
fn zero_sessions_returns_two() {
    let (code, _, stderr) = run_cli(&["nekomemo", "sim", "--sessions", "0", "--bot", "perfect"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("sessions must be >= 1"));
}

#[test]
fn bad_arguments_return_two() {
    let (code, stdout, stderr) = run_cli(&["nekomemo", "levels", "--difficulty", "extreme"]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Usage: nekomemo"));
}

#[test]
fn version_returns_zero() {
    let (code, stdout, _) = run_cli(&["nekomemo", "--version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("nekomemo"));
}
