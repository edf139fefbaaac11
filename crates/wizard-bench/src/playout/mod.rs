mod summary;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use wizard_core::game::{Game, GameConfig, ResampleError, WizardState};
use wizard_core::model::action::Action;
use wizard_core::model::card::Card;
use wizard_core::model::player::PlayerId;
use wizard_core::RoundError;

use crate::config::{BenchmarkConfig, ResolvedOutputs};

pub use summary::{RoundStats, SummaryCollector};

/// Plays every configured game with uniformly random decisions.
pub struct PlayoutRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub resample_checks: usize,
    pub resample_mismatches: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Result of one finished game.
pub struct GameOutcome {
    pub config: GameConfig,
    pub state: WizardState,
    pub resample_checks: usize,
    pub resample_mismatches: usize,
}

impl GameOutcome {
    pub fn returns(&self) -> Vec<f64> {
        self.state.returns()
    }
}

impl PlayoutRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute the run, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut collector = SummaryCollector::new(&self.config);
        let mut rows_written = 0usize;

        info!(
            run_id = %self.config.run_id,
            games = self.config.games.count,
            players = self.config.games.players,
            "playout run started"
        );

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let round = self.config.games.round_for(game_index);
            let outcome = self.play_game(game_index, game_seed, round)?;
            collector.record(&outcome);
            write_game_row(&mut writer, &self.config, game_index, game_seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;
        collector.write_markdown(&self.outputs.summary_md)?;

        info!(
            run_id = %self.config.run_id,
            rows_written,
            mismatches = collector.resample_mismatches(),
            "playout run finished"
        );

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            resample_checks: collector.resample_checks(),
            resample_mismatches: collector.resample_mismatches(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        game_seed: u64,
        round: usize,
    ) -> Result<GameOutcome, RunnerError> {
        let config = self.config.games.game_config(round);
        let mut rng = StdRng::seed_from_u64(game_seed);
        let mut state = WizardState::new(&config)?;

        // Player decisions are the bids plus every card play.
        let decisions = config.players * (round + 1);
        let checkpoints: HashSet<usize> = if self.config.resample.enabled {
            let amount = self.config.resample.per_game.min(decisions);
            rand::seq::index::sample(&mut rng, decisions, amount)
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };

        let mut decision = 0usize;
        let mut resample_checks = 0usize;
        let mut resample_mismatches = 0usize;

        while !state.is_terminal() {
            if !state.is_chance_node() {
                if checkpoints.contains(&decision) {
                    resample_checks += 1;
                    if !self.check_resample(&state, &mut rng)? {
                        resample_mismatches += 1;
                        warn!(
                            game_index,
                            move_number = state.move_number(),
                            "resampled state diverged from the public history"
                        );
                    }
                }
                decision += 1;
            }

            let action = choose_action(&state, &mut rng).ok_or(RunnerError::Stalled {
                game_index,
                move_number: state.move_number(),
            })?;
            state.apply_action(action)?;
        }

        debug!(
            game_index,
            round,
            moves = state.move_number(),
            returns = ?state.returns(),
            "game finished"
        );

        Ok(GameOutcome {
            config,
            state,
            resample_checks,
            resample_mismatches,
        })
    }

    /// Resamples for the acting player and compares everything they can see.
    fn check_resample<R: Rng>(&self, state: &WizardState, rng: &mut R) -> Result<bool, RunnerError> {
        let Some(observer) = state.current_actor().player() else {
            return Ok(true);
        };
        let resampled = state.resample(observer, rng)?;
        Ok(same_information_state(state, &resampled, observer))
    }
}

/// Samples chance outcomes by their probability and player actions uniformly.
pub fn choose_action<G: Game, R: Rng>(state: &G, rng: &mut R) -> Option<Action> {
    if state.is_chance_node() {
        let outcomes = state.chance_outcomes();
        let weights = WeightedIndex::new(outcomes.iter().map(|&(_, p)| p)).ok()?;
        return Some(outcomes[weights.sample(rng)].0);
    }
    state.legal_actions().choose(rng).copied()
}

/// Whether `observer` sees the same game in both states: identical actors,
/// identical actions after the deal, and the same own hand and options.
pub fn same_information_state(
    original: &WizardState,
    resampled: &WizardState,
    observer: PlayerId,
) -> bool {
    let dealt = original.round().cards_dealt();
    original.move_number() == resampled.move_number()
        && original
            .history()
            .iter()
            .zip(resampled.history())
            .all(|(a, b)| a.actor == b.actor)
        && original.history()[dealt..] == resampled.history()[dealt..]
        && original.round().hand(observer) == resampled.round().hand(observer)
        && original.legal_actions_for(observer) == resampled.legal_actions_for(observer)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let round = outcome.state.round();
    let row = GameLogRow {
        run_id: config.run_id.clone(),
        game_id: format!("G{game_index:05}"),
        game_index,
        game_seed,
        players: outcome.config.players,
        round: outcome.config.round,
        start_player: outcome.config.start_player,
        trump: round.trump(),
        bids: round.bids().to_vec(),
        tricks_won: round.tricks_won().to_vec(),
        returns: outcome.returns(),
        moves: outcome.state.move_number(),
        resample_checks: outcome.resample_checks,
        resample_mismatches: outcome.resample_mismatches,
        history: outcome.state.history_string(),
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    players: usize,
    round: usize,
    start_player: usize,
    trump: Option<Card>,
    bids: Vec<u8>,
    tricks_won: Vec<u8>,
    returns: Vec<f64>,
    moves: usize,
    resample_checks: usize,
    resample_mismatches: usize,
    history: String,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Game(#[from] RoundError),
    #[error("resampling failed: {0}")]
    Resample(#[from] ResampleError),
    #[error("game {game_index} has no legal action at move {move_number}")]
    Stalled {
        game_index: usize,
        move_number: usize,
    },
}
