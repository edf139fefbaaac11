use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 6;

/// Seat index in `0..num_players`, counted clockwise from seat 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self, num_players: usize) -> PlayerId {
        PlayerId(((self.0 as usize + 1) % num_players) as u8)
    }

    pub const fn previous(self, num_players: usize) -> PlayerId {
        PlayerId(((self.0 as usize + num_players - 1) % num_players) as u8)
    }

    /// All seats of a table in turn order.
    pub fn all(num_players: usize) -> impl Iterator<Item = PlayerId> {
        (0..num_players as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who acts next in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Player(PlayerId),
    Chance,
    Terminal,
}

impl Actor {
    /// Numeric id with the conventional sentinels: -1 chance, -4 terminal.
    pub const fn id(self) -> i32 {
        match self {
            Actor::Player(player) => player.0 as i32,
            Actor::Chance => -1,
            Actor::Terminal => -4,
        }
    }

    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Actor::Player(player) => Some(player),
            _ => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
