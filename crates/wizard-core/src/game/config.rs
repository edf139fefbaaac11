use crate::model::card::NUM_DISTINCT_CARDS;
use crate::model::deck::DECK_SIZE;
use crate::model::player::{MAX_PLAYERS, MIN_PLAYERS, PlayerId};
use crate::model::score::RewardMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PLAYERS: usize = 4;
pub const FIRST_ROUND: usize = 1;

/// Parameters of a single round of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub players: usize,
    /// Cards dealt to each player, which is also the number of tricks.
    pub round: usize,
    pub start_player: usize,
    pub reward_mode: RewardMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count {0} outside 3..=6")]
    Players(usize),
    #[error("round {round} outside 1..={max} for {players} players")]
    Round {
        round: usize,
        players: usize,
        max: usize,
    },
    #[error("start player {start} is not seated at a table of {players}")]
    StartPlayer { start: usize, players: usize },
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            round: FIRST_ROUND,
            start_player: 0,
            reward_mode: RewardMode::Normal,
        }
    }
}

impl GameConfig {
    pub fn new(players: usize, round: usize) -> Self {
        Self {
            players,
            round,
            ..Self::default()
        }
    }

    pub fn with_start_player(mut self, start_player: usize) -> Self {
        self.start_player = start_player;
        self
    }

    pub fn with_reward_mode(mut self, reward_mode: RewardMode) -> Self {
        self.reward_mode = reward_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::Players(self.players));
        }
        let max = self.max_round();
        if self.round == 0 || self.round > max {
            return Err(ConfigError::Round {
                round: self.round,
                players: self.players,
                max,
            });
        }
        if self.start_player >= self.players {
            return Err(ConfigError::StartPlayer {
                start: self.start_player,
                players: self.players,
            });
        }
        Ok(())
    }

    /// Largest round that the deck can supply at this table size.
    pub fn max_round(&self) -> usize {
        DECK_SIZE / self.players.max(1)
    }

    pub fn start_seat(&self) -> PlayerId {
        PlayerId::new(self.start_player as u8)
    }

    /// Deals, trump reveal, one bid per player, then every card play.
    pub fn max_game_length(&self) -> usize {
        2 * self.players * self.round + 1 + self.players
    }

    /// Distinct outcomes a chance node can have: one per card face.
    pub fn max_chance_outcomes(&self) -> usize {
        NUM_DISTINCT_CARDS
    }

    pub fn min_utility(&self) -> f64 {
        self.reward_mode.min_utility(self.max_round())
    }

    pub fn max_utility(&self) -> f64 {
        self.reward_mode.max_utility(self.max_round())
    }
}
