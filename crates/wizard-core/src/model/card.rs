use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of distinct card faces: two specials plus four suits of thirteen.
pub const NUM_DISTINCT_CARDS: usize = NUM_SPECIALS + Suit::ALL.len() * Rank::PER_SUIT;

/// Number of suitless card faces (zero-card and wild).
pub const NUM_SPECIALS: usize = 2;

const ZERO_INDEX: usize = 0;
const WILD_INDEX: usize = 1;

/// A single card face. Suitless cards are either the zero-card or the wild;
/// colored cards carry a rank in `1..=13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    suit: Option<Suit>,
    rank: Rank,
}

/// Result of comparing the card already leading a trick with a challenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Win,
    Lose,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("invalid card format: {0}")]
    InvalidFormat(String),
}

impl Card {
    pub const ZERO: Card = Card {
        suit: None,
        rank: Rank::ZERO,
    };

    pub const WILD: Card = Card {
        suit: None,
        rank: Rank::WILD,
    };

    /// Builds a card, rejecting suit/rank combinations that do not exist.
    pub fn new(suit: Option<Suit>, rank: Rank) -> Result<Self, CardError> {
        match suit {
            None if rank.is_special() => Ok(Self { suit, rank }),
            Some(_) if rank.is_colored() => Ok(Self { suit, rank }),
            _ => Err(CardError::InvalidFormat(format!(
                "no card with suit {} and rank {rank}",
                suit.map_or(Suit::WHITE_LETTER, Suit::letter)
            ))),
        }
    }

    /// Colored card constructor for rank values known to be in range.
    pub fn colored(suit: Suit, value: u8) -> Result<Self, CardError> {
        let rank = Rank::from_value(value)
            .ok_or_else(|| CardError::InvalidFormat(format!("rank {value} out of range")))?;
        Self::new(Some(suit), rank)
    }

    /// Decodes a card from its contiguous index in `0..NUM_DISTINCT_CARDS`.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            ZERO_INDEX => Some(Card::ZERO),
            WILD_INDEX => Some(Card::WILD),
            _ if index < NUM_DISTINCT_CARDS => {
                let offset = index - NUM_SPECIALS;
                let suit = Suit::from_index(offset / Rank::PER_SUIT)?;
                let rank = Rank::from_value((offset % Rank::PER_SUIT) as u8 + 1)?;
                Some(Self {
                    suit: Some(suit),
                    rank,
                })
            }
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self.suit {
            None if self.rank == Rank::WILD => WILD_INDEX,
            None => ZERO_INDEX,
            Some(suit) => {
                NUM_SPECIALS + suit.index() * Rank::PER_SUIT + self.rank.value() as usize - 1
            }
        }
    }

    pub const fn suit(self) -> Option<Suit> {
        self.suit
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub fn is_wild(self) -> bool {
        self == Card::WILD
    }

    pub fn is_zero(self) -> bool {
        self == Card::ZERO
    }

    pub fn is_trump(self, trump: Option<Suit>) -> bool {
        trump.is_some() && self.suit == trump
    }

    /// Decides whether `self`, already on the table, holds against `other`
    /// under the given trump suit. Ties stay with `self`.
    ///
    /// The checks run in a fixed order: wild, zero-card, trump, then rank
    /// within a shared suit. A trump zero-card therefore still loses to a
    /// wild, and two wilds resolve in favour of the earlier one.
    pub fn compare(self, other: Card, trump: Option<Suit>) -> Comparison {
        if self.is_wild() {
            return Comparison::Win;
        }
        if other.is_wild() {
            return Comparison::Lose;
        }
        if self.is_zero() && !other.is_zero() {
            return Comparison::Lose;
        }
        match (self.is_trump(trump), other.is_trump(trump)) {
            (true, false) => return Comparison::Win,
            (false, true) => return Comparison::Lose,
            _ => {}
        }
        if self.suit != other.suit || self.rank >= other.rank {
            Comparison::Win
        } else {
            Comparison::Lose
        }
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.suit.map_or(Suit::WHITE_LETTER, Suit::letter);
        write!(f, "[{letter}{}]", self.rank)
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CardError::InvalidFormat(s.to_string());
        let inner = s
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(invalid)?;
        let mut chars = inner.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Only the canonical form parses, so text round-trips exactly.
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(invalid());
        }
        let value: u8 = digits.parse().map_err(|_| invalid())?;
        let rank = Rank::from_value(value).ok_or_else(invalid)?;
        let suit = if letter == Suit::WHITE_LETTER {
            None
        } else {
            Some(Suit::from_letter(letter).ok_or_else(invalid)?)
        };
        Card::new(suit, rank).map_err(|_| invalid())
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardError, Comparison, NUM_DISTINCT_CARDS};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn index_layout_puts_specials_first() {
        assert_eq!(Card::from_index(0), Some(Card::ZERO));
        assert_eq!(Card::from_index(1), Some(Card::WILD));
        assert_eq!(Card::from_index(2), Some(card("[B1]")));
        assert_eq!(Card::from_index(14), Some(card("[B13]")));
        assert_eq!(Card::from_index(15), Some(card("[R1]")));
        assert_eq!(Card::from_index(53), Some(card("[Y13]")));
        assert_eq!(Card::from_index(NUM_DISTINCT_CARDS), None);
    }

    #[test]
    fn index_roundtrip_covers_every_card() {
        for index in 0..NUM_DISTINCT_CARDS {
            let card = Card::from_index(index).unwrap();
            assert_eq!(card.index(), index);
            assert_eq!(card.to_string().parse::<Card>().unwrap(), card);
        }
    }

    #[test]
    fn display_uses_bracketed_letter_and_rank() {
        assert_eq!(Card::ZERO.to_string(), "[W0]");
        assert_eq!(Card::WILD.to_string(), "[W14]");
        assert_eq!(Card::colored(Suit::Green, 12).unwrap().to_string(), "[G12]");
    }

    #[test]
    fn parse_rejects_malformed_strings() {
        for bad in [
            "[X5]", "[B0]", "[B14]", "[W5]", "B5", "[B]", "[]", "[B+5]", "[W15]", "[B05]",
            "[W014]", "[W00]",
        ] {
            assert!(
                matches!(bad.parse::<Card>(), Err(CardError::InvalidFormat(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn every_parsed_string_formats_back_unchanged() {
        for text in ["[W0]", "[W14]", "[B1]", "[R10]", "[Y13]"] {
            assert_eq!(text.parse::<Card>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn constructor_enforces_suit_rank_invariant() {
        assert!(Card::new(None, Rank::MIN).is_err());
        assert!(Card::new(Some(Suit::Red), Rank::WILD).is_err());
        assert_eq!(Card::new(None, Rank::WILD).unwrap(), Card::WILD);
    }

    #[test]
    fn wild_beats_everything_and_ties_favour_left() {
        let trump = Some(Suit::Red);
        assert_eq!(Card::WILD.compare(Card::WILD, trump), Comparison::Win);
        assert_eq!(card("[R13]").compare(Card::WILD, trump), Comparison::Lose);
        assert_eq!(Card::WILD.compare(card("[R13]"), trump), Comparison::Win);
    }

    #[test]
    fn zero_card_loses_unless_matched() {
        assert_eq!(Card::ZERO.compare(card("[B1]"), None), Comparison::Lose);
        assert_eq!(Card::ZERO.compare(Card::ZERO, None), Comparison::Win);
        assert_eq!(card("[B1]").compare(Card::ZERO, None), Comparison::Win);
    }

    #[test]
    fn trump_beats_other_suits() {
        let trump = Some(Suit::Yellow);
        assert_eq!(card("[B13]").compare(card("[Y1]"), trump), Comparison::Lose);
        assert_eq!(card("[Y1]").compare(card("[B13]"), trump), Comparison::Win);
        assert_eq!(card("[Y2]").compare(card("[Y9]"), trump), Comparison::Lose);
    }

    #[test]
    fn off_suit_cannot_beat_leader_without_trump() {
        assert_eq!(card("[B2]").compare(card("[R13]"), None), Comparison::Win);
        assert_eq!(card("[B2]").compare(card("[B3]"), None), Comparison::Lose);
        assert_eq!(card("[B3]").compare(card("[B3]"), None), Comparison::Win);
    }

    #[test]
    fn serde_uses_card_string() {
        let json = serde_json::to_string(&card("[G7]")).unwrap();
        assert_eq!(json, "\"[G7]\"");
        let back: Card = serde_json::from_str("\"[W14]\"").unwrap();
        assert_eq!(back, Card::WILD);
        assert!(serde_json::from_str::<Card>("\"[Q1]\"").is_err());
    }
}
