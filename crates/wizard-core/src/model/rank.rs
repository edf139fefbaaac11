use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Face value of a card. Colored cards run 1..=13; the two suitless specials
/// sit outside that range at 0 (zero-card) and 14 (wild).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rank {0} is outside 0..=14")]
pub struct RankError(pub u8);

impl Rank {
    pub const ZERO: Rank = Rank(0);
    pub const MIN: Rank = Rank(1);
    pub const MAX: Rank = Rank(13);
    pub const WILD: Rank = Rank(14);

    /// Number of ranks in each colored suit.
    pub const PER_SUIT: usize = 13;

    pub const fn from_value(value: u8) -> Option<Self> {
        if value <= Rank::WILD.0 {
            Some(Rank(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_special(self) -> bool {
        self.0 == Rank::ZERO.0 || self.0 == Rank::WILD.0
    }

    pub const fn is_colored(self) -> bool {
        self.0 >= Rank::MIN.0 && self.0 <= Rank::MAX.0
    }
}

impl TryFrom<u8> for Rank {
    type Error = RankError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::from_value(value).ok_or(RankError(value))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
