use nekomemo_cli::run;
use nekomemo_engine::level::LevelConfig;

fn stdout_of(args: &[&str]) -> String {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(args, &mut out, &mut err), 0);
    String::from_utf8(out).unwrap()
}

#[test]
fn levels_json_round_trips_through_engine_types() {
    let text = stdout_of(&["nekomemo", "levels", "--difficulty", "advanced", "--json"]);
    let levels: Vec<LevelConfig> = serde_json::from_str(&text).unwrap();
    assert_eq!(levels.len(), 50);
    let last = levels.last().unwrap();
    assert_eq!(last.global_id, 149);
    assert_eq!(last.grid_count, 2);
    assert!(last.shuffle_enabled);
}

#[test]
fn levels_table_marks_shuffle_levels() {
    let text = stdout_of(&["nekomemo", "levels", "--difficulty", "easy"]);
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 50);
    assert!(rows[0].contains(" no "));
    assert!(rows[30].contains("Shuffle"));
    assert!(rows[30].contains(" yes "));
}

#[test]
fn prices_show_gacha_curve() {
    let text = stdout_of(&["nekomemo", "prices", "--count", "4"]);
    assert!(text.contains("  50 60 80 90\n"));
    assert!(text.contains("  100 150 250 300\n"));
}
