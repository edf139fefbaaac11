use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use wizard_core::game::GameConfig;
use wizard_core::model::score::RewardMode;

const DEFAULT_PLAYERS: usize = 4;
const DEFAULT_RESAMPLES_PER_GAME: usize = 4;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    #[serde(default)]
    pub resample: ResampleConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O. An empty round
    /// list expands to every round the table size allows.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.resample.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Which games to play and how to seed them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub count: usize,
    pub seed: Option<u64>,
    #[serde(default = "default_players")]
    pub players: usize,
    /// Rounds cycled through game by game.
    #[serde(default)]
    pub rounds: Vec<usize>,
    #[serde(default)]
    pub start_player: usize,
    #[serde(default)]
    pub reward_mode: RewardMode,
}

impl GamesConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        let probe = GameConfig::new(self.players, 1).with_start_player(self.start_player);
        probe.validate().map_err(|err| ValidationError::InvalidField {
            field: "games".to_string(),
            message: err.to_string(),
        })?;

        if self.rounds.is_empty() {
            self.rounds = (1..=probe.max_round()).collect();
        }
        for &round in &self.rounds {
            self.game_config(round)
                .validate()
                .map_err(|err| ValidationError::InvalidField {
                    field: "games.rounds".to_string(),
                    message: err.to_string(),
                })?;
        }
        Ok(())
    }

    /// Round played by the `game_index`-th game.
    pub fn round_for(&self, game_index: usize) -> usize {
        match self.rounds.len() {
            0 => 1,
            len => self.rounds[game_index % len],
        }
    }

    pub fn game_config(&self, round: usize) -> GameConfig {
        GameConfig::new(self.players, round)
            .with_start_player(self.start_player)
            .with_reward_mode(self.reward_mode)
    }
}

fn default_players() -> usize {
    DEFAULT_PLAYERS
}

/// Resampler fidelity checks run during playouts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResampleConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_resamples_per_game")]
    pub per_game: usize,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            per_game: DEFAULT_RESAMPLES_PER_GAME,
        }
    }
}

impl ResampleConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.per_game == 0 {
            return Err(ValidationError::InvalidField {
                field: "resample.per_game".to_string(),
                message: "at least one resample per game is required when enabled".to_string(),
            });
        }
        Ok(())
    }
}

fn default_resamples_per_game() -> usize {
    DEFAULT_RESAMPLES_PER_GAME
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory that holds the summary and, when enabled, `telemetry.jsonl`.
    pub fn output_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "nightly_3p"
games:
  seed: 123
  count: 16
  players: 3
  rounds: [1, 5, 20]
resample:
  enabled: true
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.resample.per_game, DEFAULT_RESAMPLES_PER_GAME);
        assert_eq!(cfg.games.reward_mode, RewardMode::Normal);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.games.round_for(4), 5);

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/nightly_3p/games.jsonl")
        );
        assert_eq!(outputs.output_dir(), PathBuf::from("bench/out/nightly_3p"));
    }

    #[test]
    fn empty_round_list_covers_every_round() {
        let yaml = BASIC_YAML.replace("  rounds: [1, 5, 20]\n", "");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.games.rounds, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_round_too_large_for_table() {
        let yaml = BASIC_YAML.replace("[1, 5, 20]", "[1, 21]");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("round 21 cannot be dealt");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "games.rounds"
        ));
    }

    #[test]
    fn rejects_unsupported_player_count() {
        let yaml = BASIC_YAML.replace("players: 3", "players: 7");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("seven players");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "games"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("nightly_3p", "nightly 3p");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn binary_reward_mode_parses() {
        let yaml = BASIC_YAML.replace("players: 3", "players: 3\n  reward_mode: binary");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.games.game_config(5).reward_mode, RewardMode::Binary);
    }
}
