use std::fs;

use tempfile::tempdir;
use wizard_bench::config::BenchmarkConfig;
use wizard_bench::playout::PlayoutRunner;

fn load_config(output_dir: &std::path::Path, players: usize) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: 4242
  count: 6
  players: {players}
  rounds: [1, 3, 7]
  start_player: 1
resample:
  enabled: true
  per_game: 3
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("games.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn playout_smoke_test_writes_rows_and_summary() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), 4);
    let outputs = config.resolved_outputs();

    let summary = PlayoutRunner::new(config, outputs)
        .run()
        .expect("playouts complete");

    assert_eq!(summary.games_played, 6);
    assert_eq!(summary.rows_written, 6);
    assert_eq!(summary.resample_checks, 18);
    assert_eq!(summary.resample_mismatches, 0);

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 6);
    for (index, row) in rows.iter().enumerate() {
        let round = [1, 3, 7][index % 3];
        assert_eq!(row["round"], round);
        assert_eq!(row["players"], 4);
        let tricks: u64 = row["tricks_won"]
            .as_array()
            .expect("tricks array")
            .iter()
            .map(|t| t.as_u64().expect("trick count"))
            .sum();
        assert_eq!(tricks, round as u64);
        assert_eq!(row["moves"], 2 * 4 * round + 1 + 4);
        assert!(row["trump"].as_str().expect("trump card").starts_with('['));
    }

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(markdown.contains("# Playout Summary"));
    assert!(markdown.contains("18 checks, 0 mismatches"));
}

#[test]
fn same_seed_reproduces_the_same_rows() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    let mut contents = Vec::new();
    for dir in [&first, &second] {
        let config = load_config(dir.path(), 3);
        let outputs = config.resolved_outputs();
        let summary = PlayoutRunner::new(config, outputs)
            .run()
            .expect("playouts complete");
        contents.push(fs::read_to_string(&summary.jsonl_path).expect("jsonl readable"));
    }
    assert_eq!(contents[0], contents[1]);
}
