use crate::model::card::{Card, Comparison};
use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use thiserror::Error;

/// Cards on the table for the trick in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    leader: PlayerId,
    num_players: usize,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub player: PlayerId,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected player {expected} to play next but got {actual}")]
    OutOfTurn { expected: PlayerId, actual: PlayerId },
}

impl Trick {
    pub fn new(leader: PlayerId, num_players: usize) -> Self {
        Self {
            leader,
            num_players,
            plays: Vec::with_capacity(num_players),
        }
    }

    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.num_players
    }

    /// Suit of the first card that is not a zero-card. A leading wild, or a
    /// table of nothing but zero-cards, leaves every card playable.
    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays
            .iter()
            .find(|play| !play.card.is_zero())
            .and_then(|play| play.card.suit())
    }

    pub fn play(&mut self, player: PlayerId, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        let expected = self.expected_player();
        if expected != player {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: player,
            });
        }

        self.plays.push(Play { player, card });
        Ok(())
    }

    /// Left-to-right fold: a card only takes over when it strictly beats the
    /// current best, so the earliest unbeaten card wins.
    pub fn winner(&self, trump: Option<Suit>) -> Option<PlayerId> {
        if !self.is_complete() {
            return None;
        }
        let (first, rest) = self.plays.split_first()?;
        let best = rest.iter().fold(*first, |best, challenger| {
            match best.card.compare(challenger.card, trump) {
                Comparison::Win => best,
                Comparison::Lose => *challenger,
            }
        });
        Some(best.player)
    }

    fn expected_player(&self) -> PlayerId {
        self.plays
            .last()
            .map(|play| play.player.next(self.num_players))
            .unwrap_or(self.leader)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::player::PlayerId;
    use crate::model::suit::Suit;

    fn p(index: u8) -> PlayerId {
        PlayerId::new(index)
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn trick_of(leader: u8, cards: &[&str]) -> Trick {
        let mut trick = Trick::new(p(leader), cards.len());
        let mut seat = p(leader);
        for c in cards {
            trick.play(seat, card(c)).unwrap();
            seat = seat.next(cards.len());
        }
        trick
    }

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(p(2), 3);
        assert!(trick.play(p(2), card("[B2]")).is_ok());
        assert!(matches!(
            trick.play(p(1), card("[B3]")),
            Err(TrickError::OutOfTurn { .. })
        ));
        assert!(trick.play(p(0), card("[B3]")).is_ok());
    }

    #[test]
    fn lead_suit_skips_zero_cards() {
        let trick = trick_of(0, &["[W0]", "[W0]", "[G4]", "[B9]"]);
        assert_eq!(trick.lead_suit(), Some(Suit::Green));
        let zeros = trick_of(0, &["[W0]", "[W0]", "[W0]"]);
        assert_eq!(zeros.lead_suit(), None);
        let wild = trick_of(0, &["[W14]", "[G4]", "[B9]"]);
        assert_eq!(wild.lead_suit(), None);
    }

    #[test]
    fn winner_is_highest_card_of_lead_suit() {
        let trick = trick_of(1, &["[B10]", "[B12]", "[R13]", "[B4]"]);
        assert_eq!(trick.winner(None), Some(p(2)));
    }

    #[test]
    fn trump_takes_the_trick() {
        let trick = trick_of(0, &["[B10]", "[R2]", "[B12]"]);
        assert_eq!(trick.winner(Some(Suit::Red)), Some(p(1)));
    }

    #[test]
    fn first_wild_wins_ties() {
        let trick = trick_of(3, &["[B10]", "[W14]", "[W14]", "[R13]"]);
        assert_eq!(trick.winner(Some(Suit::Red)), Some(p(0)));
    }

    #[test]
    fn all_zero_cards_go_to_the_leader() {
        let trick = trick_of(2, &["[W0]", "[W0]", "[W0]"]);
        assert_eq!(trick.winner(Some(Suit::Blue)), Some(p(2)));
    }

    #[test]
    fn incomplete_trick_has_no_winner() {
        let mut trick = Trick::new(p(0), 3);
        trick.play(p(0), card("[Y1]")).unwrap();
        assert_eq!(trick.winner(None), None);
    }
}
