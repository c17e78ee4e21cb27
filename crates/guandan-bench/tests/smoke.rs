use std::fs;
use std::path::Path;

use guandan_bench::config::BenchmarkConfig;
use guandan_bench::tournament::TournamentRunner;
use tempfile::tempdir;

fn load_config(output_dir: &Path, seed: u64) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: {seed}
  count: 2
  starting_level: "King"
seats:
  - name: "aggressive"
    personality: "aggressive"
  - name: "simple"
    analyzer: false
  - name: "cooperative"
    personality: "cooperative"
  - name: "conservative"
    personality: "conservative"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("rounds.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_to_string(dir: &Path, seed: u64) -> String {
    let config = load_config(dir, seed);
    let outputs = config.resolved_outputs();
    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("self-play completes");
    fs::read_to_string(&summary.jsonl_path).expect("jsonl readable")
}

#[test]
fn self_play_writes_one_row_per_round() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), 4242);
    let outputs = config.resolved_outputs();

    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("self-play completes");

    assert_eq!(summary.games_played, 2);
    // King then Ace: two rounds per game.
    assert_eq!(summary.rounds_played, 4);
    assert_eq!(summary.rows_written, summary.rounds_played);
    assert!(summary.telemetry_path.is_none());

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), summary.rows_written);

    for row in &rows {
        assert_eq!(row["run_id"], "test_smoke");
        let seat = row["winner_seat"].as_u64().expect("winner seat");
        assert!(seat < 4);
        assert_eq!(row["team"].as_u64(), Some(seat % 2));
        assert!(row["plays"].as_u64().unwrap_or(0) > 0);
    }
    assert_eq!(rows[0]["level"], "King");
    assert_eq!(rows[1]["level"], "Ace");

    let summary_md = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(summary_md.contains("# Self-play Summary: test_smoke"));
    assert!(summary_md.contains("| aggressive + cooperative |"));
    assert!(summary_md.contains("| simple + conservative |"));
}

#[test]
fn same_seed_replays_identically() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");

    let a = run_to_string(first.path(), 77);
    let b = run_to_string(second.path(), 77);
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn wrong_seat_count_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let mut config = load_config(dir.path(), 1);
    config.seats.pop();
    assert!(config.validate().is_err());

    let outputs = config.resolved_outputs();
    assert!(TournamentRunner::new(config, outputs).is_err());
}
