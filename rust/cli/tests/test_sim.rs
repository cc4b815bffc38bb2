use nekomemo_cli::run;
use nekomemo_engine::logger::SessionRecord;
use nekomemo_engine::session::SessionOutcome;
use serial_test::serial;
use std::fs;

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
#[serial]
fn sim_runs_sessions_and_writes_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("sim.jsonl");
    let path_str = path.to_string_lossy().to_string();
    let (code, stdout, _) = run_cli(&[
        "nekomemo",
        "sim",
        "--level",
        "15",
        "--sessions",
        "3",
        "--seed",
        "1",
        "--bot",
        "perfect",
        "--output",
        &path_str,
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Simulating 3 session(s) of level 15"));
    assert!(stdout.contains("won 3  lost 0  unfinished 0"));

    let contents = fs::read_to_string(&path).unwrap();
    let records: Vec<SessionRecord> = contents
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid record"))
        .collect();
    assert_eq!(records.len(), 3);
    for (i, rec) in records.iter().enumerate() {
        assert_eq!(rec.seed, Some(1 + i as u64));
        assert_eq!(rec.level_id, Some(15));
        assert_eq!(rec.pairs_found, 12);
        assert!(rec.ts.is_some());
        assert_eq!(rec.meta.as_ref().unwrap()["bot"], "perfect");
    }
    assert!(matches!(
        records[0].outcome,
        Some(SessionOutcome::Won {
            is_first_clear: true,
            ..
        })
    ));
    assert!(matches!(
        records[1].outcome,
        Some(SessionOutcome::Won {
            is_first_clear: false,
            ..
        })
    ));
}

#[test]
#[serial]
fn same_seed_same_transcript() {
    let args = [
        "nekomemo", "sim", "--level", "60", "--sessions", "2", "--seed", "9", "--bot",
        "forgetful",
    ];
    let (code_a, out_a, _) = run_cli(&args);
    let (code_b, out_b, _) = run_cli(&args);
    assert_eq!(code_a, 0);
    assert_eq!(code_b, 0);
    assert_eq!(out_a, out_b);
}

#[test]
#[serial]
fn time_attack_with_random_bot_ends() {
    let (code, stdout, _) = run_cli(&[
        "nekomemo",
        "sim",
        "--time-attack",
        "--seed",
        "3",
        "--bot",
        "random",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("of time-attack"));
    assert!(stdout.contains("Grids cleared:"));
}

#[test]
#[serial]
fn break_after_reports_interruption() {
    // SAFETY: serialized with every other test that touches the environment
    unsafe { std::env::set_var("NEKOMEMO_SIM_BREAK_AFTER", "1") };
    let (code, stdout, _) = run_cli(&[
        "nekomemo", "sim", "--level", "0", "--sessions", "3", "--seed", "2",
    ]);
    unsafe { std::env::remove_var("NEKOMEMO_SIM_BREAK_AFTER") };
    assert_eq!(code, 130);
    assert!(stdout.contains("Interrupted: saved 1/3"));
}
