use crate::model::card::{Card, NUM_DISTINCT_CARDS};
use crate::model::deck::DECK_SIZE;

/// Integer action identifier shared by chance outcomes, bids and card plays.
pub type Action = usize;

/// Number of card-play actions: one per distinct card face.
pub const NUM_CARD_ACTIONS: usize = NUM_DISTINCT_CARDS;

/// Splits the action id space for a table size into two disjoint ranges:
/// bids occupy `[0, num_guess_actions)` and card plays follow immediately
/// after, one per card index. Chance outcomes reuse the raw card index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpace {
    num_guess_actions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Bid(u8),
    Play(Card),
}

impl ActionSpace {
    pub const fn for_players(num_players: usize) -> Self {
        Self {
            num_guess_actions: DECK_SIZE / num_players + 1,
        }
    }

    pub const fn num_guess_actions(self) -> usize {
        self.num_guess_actions
    }

    pub const fn num_distinct_actions(self) -> usize {
        self.num_guess_actions + NUM_CARD_ACTIONS
    }

    pub fn bid(self, tricks: u8) -> Action {
        Action::from(tricks)
    }

    pub fn play(self, card: Card) -> Action {
        self.num_guess_actions + card.index()
    }

    pub fn decode(self, action: Action) -> Option<PlayerAction> {
        if action < self.num_guess_actions {
            u8::try_from(action).ok().map(PlayerAction::Bid)
        } else {
            Card::from_index(action - self.num_guess_actions).map(PlayerAction::Play)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionSpace, PlayerAction};
    use crate::model::card::Card;

    #[test]
    fn guess_range_depends_on_table_size() {
        assert_eq!(ActionSpace::for_players(3).num_guess_actions(), 21);
        assert_eq!(ActionSpace::for_players(4).num_guess_actions(), 16);
        assert_eq!(ActionSpace::for_players(6).num_guess_actions(), 11);
        assert_eq!(ActionSpace::for_players(4).num_distinct_actions(), 70);
    }

    #[test]
    fn bids_and_cards_do_not_overlap() {
        let space = ActionSpace::for_players(4);
        assert_eq!(space.decode(space.bid(15)), Some(PlayerAction::Bid(15)));
        assert_eq!(space.play(Card::ZERO), 16);
        assert_eq!(space.decode(16), Some(PlayerAction::Play(Card::ZERO)));
        assert_eq!(space.decode(17), Some(PlayerAction::Play(Card::WILD)));
        assert_eq!(space.decode(70), None);
    }
}
