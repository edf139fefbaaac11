use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the four colored suits. Special cards carry no suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Blue = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Blue, Suit::Red, Suit::Green, Suit::Yellow];

    /// Letter used for suitless cards in the card string format.
    pub const WHITE_LETTER: char = 'W';

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Blue),
            1 => Some(Suit::Red),
            2 => Some(Suit::Green),
            3 => Some(Suit::Yellow),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn letter(self) -> char {
        match self {
            Suit::Blue => 'B',
            Suit::Red => 'R',
            Suit::Green => 'G',
            Suit::Yellow => 'Y',
        }
    }

    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'B' => Some(Suit::Blue),
            'R' => Some(Suit::Red),
            'G' => Some(Suit::Green),
            'Y' => Some(Suit::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
