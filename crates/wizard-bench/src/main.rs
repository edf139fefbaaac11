use std::path::PathBuf;

use clap::Parser;

use wizard_bench::config::{BenchmarkConfig, ResolvedOutputs};
use wizard_bench::logging::init_logging;
use wizard_bench::playout::PlayoutRunner;

/// Random-playout harness for the Wizard rules engine.
#[derive(Debug, Parser)]
#[command(
    name = "wizard-bench",
    author,
    version,
    about = "Deterministic Wizard playout harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the master RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Run resampling checks regardless of config.
    #[arg(long)]
    resample: bool,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if cli.resample {
        config.resample.enabled = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let players = config.games.players;

    println!("Loaded configuration '{run_id}' ({games} games, {players} players)");

    if cli.validate_only {
        println!("Validation-only mode: playouts skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = PlayoutRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Run complete for '{run_id}': {} games → {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if summary.resample_checks > 0 {
        println!(
            "Resampling: {} checks, {} mismatches",
            summary.resample_checks, summary.resample_mismatches
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    if summary.resample_mismatches > 0 {
        anyhow::bail!(
            "{} resampled states diverged from their public history",
            summary.resample_mismatches
        );
    }
    Ok(())
}
