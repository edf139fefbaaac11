use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use wizard_core::model::score::RewardMode;

use super::GameOutcome;
use crate::config::BenchmarkConfig;

/// Aggregates for every game played at one round size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundStats {
    pub games: usize,
    pub moves: usize,
    /// Seat-games whose bid matched the tricks taken.
    pub exact_bids: usize,
    pub seat_games: usize,
    pub total_return: f64,
    pub min_return: Option<f64>,
    pub max_return: Option<f64>,
}

impl RoundStats {
    fn record(&mut self, outcome: &GameOutcome) {
        let round = outcome.state.round();
        self.games += 1;
        self.moves += outcome.state.move_number();
        for (value, (bid, won)) in outcome
            .returns()
            .into_iter()
            .zip(round.bids().iter().zip(round.tricks_won()))
        {
            self.seat_games += 1;
            if bid == won {
                self.exact_bids += 1;
            }
            self.total_return += value;
            self.min_return = Some(self.min_return.map_or(value, |m| m.min(value)));
            self.max_return = Some(self.max_return.map_or(value, |m| m.max(value)));
        }
    }

    pub fn exact_rate(&self) -> f64 {
        if self.seat_games == 0 {
            0.0
        } else {
            self.exact_bids as f64 / self.seat_games as f64
        }
    }

    pub fn mean_return(&self) -> f64 {
        if self.seat_games == 0 {
            0.0
        } else {
            self.total_return / self.seat_games as f64
        }
    }

    pub fn mean_moves(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.moves as f64 / self.games as f64
        }
    }
}

pub struct SummaryCollector {
    run_id: String,
    players: usize,
    reward_mode: RewardMode,
    rounds: BTreeMap<usize, RoundStats>,
    resample_checks: usize,
    resample_mismatches: usize,
}

impl SummaryCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            run_id: config.run_id.clone(),
            players: config.games.players,
            reward_mode: config.games.reward_mode,
            rounds: BTreeMap::new(),
            resample_checks: 0,
            resample_mismatches: 0,
        }
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        self.rounds
            .entry(outcome.config.round)
            .or_default()
            .record(outcome);
        self.resample_checks += outcome.resample_checks;
        self.resample_mismatches += outcome.resample_mismatches;
    }

    pub fn round_stats(&self, round: usize) -> Option<&RoundStats> {
        self.rounds.get(&round)
    }

    pub fn resample_checks(&self) -> usize {
        self.resample_checks
    }

    pub fn resample_mismatches(&self) -> usize {
        self.resample_mismatches
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Playout Summary\n\n");
        let _ = writeln!(
            out,
            "Run `{}`: {} players, {:?} rewards\n",
            self.run_id, self.players, self.reward_mode
        );
        out.push_str("| Round | Games | Avg moves | Exact bid % | Mean return | Min | Max |\n");
        out.push_str("|-------|-------|-----------|-------------|-------------|-----|-----|\n");
        for (round, stats) in &self.rounds {
            let _ = writeln!(
                out,
                "| {round} | {games} | {moves:.1} | {exact:.1}% | {mean:+.2} | {min:+.1} | {max:+.1} |",
                games = stats.games,
                moves = stats.mean_moves(),
                exact = stats.exact_rate() * 100.0,
                mean = stats.mean_return(),
                min = stats.min_return.unwrap_or(0.0),
                max = stats.max_return.unwrap_or(0.0),
            );
        }
        if self.resample_checks > 0 {
            let _ = writeln!(
                out,
                "\nResampling: {} checks, {} mismatches",
                self.resample_checks, self.resample_mismatches
            );
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path.as_ref(), self.render_markdown())
    }
}
