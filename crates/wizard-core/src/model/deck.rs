use crate::model::card::{Card, NUM_DISTINCT_CARDS};
use thiserror::Error;

/// Total number of physical cards in a fresh deck.
pub const DECK_SIZE: usize = 60;

/// Copies of each suitless special in a fresh deck.
pub const SPECIAL_COPIES: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("cannot deal {card}: every copy has already been dealt")]
    DepletedCard { card: Card },
    #[error("card index {0} is out of range")]
    UnknownIndex(usize),
}

/// Undealt cards, tracked as remaining copies per card index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    counts: [u8; NUM_DISTINCT_CARDS],
    total: usize,
}

impl Deck {
    /// Four zero-cards, four wilds and one of each colored card.
    pub fn standard() -> Self {
        let mut counts = [1u8; NUM_DISTINCT_CARDS];
        counts[Card::ZERO.index()] = SPECIAL_COPIES;
        counts[Card::WILD.index()] = SPECIAL_COPIES;
        let total = counts.iter().map(|&c| c as usize).sum();
        debug_assert_eq!(total, DECK_SIZE);
        Self { counts, total }
    }

    /// Removes one copy of the card at `index` and returns it.
    pub fn deal(&mut self, index: usize) -> Result<Card, DeckError> {
        let card = Card::from_index(index).ok_or(DeckError::UnknownIndex(index))?;
        let slot = &mut self.counts[index];
        if *slot == 0 {
            return Err(DeckError::DepletedCard { card });
        }
        *slot -= 1;
        self.total -= 1;
        Ok(card)
    }

    pub fn remaining_counts(&self) -> &[u8; NUM_DISTINCT_CARDS] {
        &self.counts
    }

    pub fn remaining(&self, card: Card) -> u8 {
        self.counts[card.index()]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck, DeckError, SPECIAL_COPIES};
    use crate::model::card::Card;

    #[test]
    fn standard_deck_has_sixty_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.total(), DECK_SIZE);
        assert_eq!(deck.remaining(Card::ZERO), SPECIAL_COPIES);
        assert_eq!(deck.remaining(Card::WILD), SPECIAL_COPIES);
        assert_eq!(deck.remaining(Card::from_index(30).unwrap()), 1);
    }

    #[test]
    fn dealing_decrements_count_and_total() {
        let mut deck = Deck::standard();
        let card = deck.deal(Card::WILD.index()).unwrap();
        assert_eq!(card, Card::WILD);
        assert_eq!(deck.remaining(Card::WILD), SPECIAL_COPIES - 1);
        assert_eq!(deck.total(), DECK_SIZE - 1);
    }

    #[test]
    fn dealing_a_depleted_card_fails_without_mutation() {
        let mut deck = Deck::standard();
        deck.deal(5).unwrap();
        let before = deck.clone();
        assert!(matches!(deck.deal(5), Err(DeckError::DepletedCard { .. })));
        assert_eq!(deck, before);
    }

    #[test]
    fn unknown_index_is_rejected() {
        let mut deck = Deck::standard();
        assert_eq!(deck.deal(54), Err(DeckError::UnknownIndex(54)));
    }
}
