use crate::game::config::{ConfigError, GameConfig};
use crate::model::action::{Action, ActionSpace, PlayerAction};
use crate::model::card::{Card, CardError};
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::model::player::{Actor, PlayerId};
use crate::model::score::{self, RewardMode};
use crate::model::suit::Suit;
use crate::model::trick::{Play, Trick, TrickError};
use thiserror::Error;
use tracing::{debug, trace};

/// One round: deal, trump reveal, bids, then `round_number` tricks.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    num_players: usize,
    round_number: usize,
    start_player: PlayerId,
    reward_mode: RewardMode,
    actions: ActionSpace,
    hands: Vec<Hand>,
    deck: Deck,
    trump: Option<Card>,
    bids: Vec<u8>,
    tricks_won: Vec<u8>,
    current_trick: Trick,
    trick_history: Vec<Trick>,
    phase: RoundPhase,
}

/// Phase-specific turn bookkeeping. `stop_turn` is the seat whose action
/// closes the bidding or the current trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Dealing {
        deal_to: PlayerId,
        cards_dealt: usize,
    },
    Bidding {
        turn: PlayerId,
        stop_turn: PlayerId,
    },
    Tricking {
        turn: PlayerId,
        stop_turn: PlayerId,
    },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealOutcome {
    Dealt { to: PlayerId, card: Card },
    TrumpRevealed(Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    /// The last card of the trick is down; call [`RoundState::update_tricks`].
    TrickComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("action {action} is not legal for actor {actor}")]
    IllegalAction { action: Action, actor: Actor },
    #[error("{operation} is not allowed in the current phase")]
    PhaseMismatch { operation: &'static str },
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Trick(#[from] TrickError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RoundState {
    pub fn new(config: &GameConfig) -> Result<Self, RoundError> {
        config.validate()?;
        let num_players = config.players;
        let start_player = config.start_seat();
        debug!(
            players = num_players,
            round = config.round,
            start_player = start_player.index(),
            "new round"
        );
        Ok(Self {
            num_players,
            round_number: config.round,
            start_player,
            reward_mode: config.reward_mode,
            actions: ActionSpace::for_players(num_players),
            hands: vec![Hand::new(); num_players],
            deck: Deck::standard(),
            trump: None,
            bids: vec![0; num_players],
            tricks_won: vec![0; num_players],
            current_trick: Trick::new(start_player, num_players),
            trick_history: Vec::with_capacity(config.round),
            phase: RoundPhase::Dealing {
                deal_to: start_player,
                cards_dealt: 0,
            },
        })
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            players: self.num_players,
            round: self.round_number,
            start_player: self.start_player.index(),
            reward_mode: self.reward_mode,
        }
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn start_player(&self) -> PlayerId {
        self.start_player
    }

    pub fn reward_mode(&self) -> RewardMode {
        self.reward_mode
    }

    pub fn action_space(&self) -> ActionSpace {
        self.actions
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The revealed trump card, once dealing is over.
    pub fn trump(&self) -> Option<Card> {
        self.trump
    }

    pub fn trump_suit(&self) -> Option<Suit> {
        self.trump.and_then(Card::suit)
    }

    pub fn bids(&self) -> &[u8] {
        &self.bids
    }

    pub fn tricks_won(&self) -> &[u8] {
        &self.tricks_won
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    /// Every card of every resolved trick, in play order.
    pub fn cards_played(&self) -> impl Iterator<Item = &Play> {
        self.trick_history.iter().flat_map(|trick| trick.plays())
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn cards_to_deal(&self) -> usize {
        self.num_players * self.round_number
    }

    pub fn cards_dealt(&self) -> usize {
        match self.phase {
            RoundPhase::Dealing { cards_dealt, .. } => cards_dealt,
            _ => self.cards_to_deal(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self.phase, RoundPhase::Finished)
    }

    pub fn current_actor(&self) -> Actor {
        match self.phase {
            RoundPhase::Dealing { .. } => Actor::Chance,
            RoundPhase::Bidding { turn, .. } | RoundPhase::Tricking { turn, .. } => {
                Actor::Player(turn)
            }
            RoundPhase::Finished => Actor::Terminal,
        }
    }

    pub fn stop_turn(&self) -> Option<PlayerId> {
        match self.phase {
            RoundPhase::Bidding { stop_turn, .. } | RoundPhase::Tricking { stop_turn, .. } => {
                Some(stop_turn)
            }
            _ => None,
        }
    }

    /// Legal actions for whoever acts now: chance outcomes while dealing,
    /// bids, then card plays. Empty once the round is over.
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.phase {
            RoundPhase::Dealing { .. } => self
                .chance_outcomes()
                .into_iter()
                .map(|(action, _)| action)
                .collect(),
            RoundPhase::Bidding { turn, .. } | RoundPhase::Tricking { turn, .. } => {
                self.legal_actions_for(turn)
            }
            RoundPhase::Finished => Vec::new(),
        }
    }

    /// Legal actions for `player`, which are empty unless it is their turn.
    pub fn legal_actions_for(&self, player: PlayerId) -> Vec<Action> {
        match self.phase {
            RoundPhase::Bidding { turn, stop_turn } if turn == player => self
                .legal_bids(player, stop_turn)
                .map(|bid| self.actions.bid(bid))
                .collect(),
            RoundPhase::Tricking { turn, .. } if turn == player => self
                .legal_cards(player)
                .into_iter()
                .map(|card| self.actions.play(card))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Each undealt card index weighted by its share of the deck. An empty
    /// deck can only occur before the trump reveal of the largest round, and
    /// then the zero-card stands in as a no-trump marker.
    pub fn chance_outcomes(&self) -> Vec<(Action, f64)> {
        if !matches!(self.phase, RoundPhase::Dealing { .. }) {
            return Vec::new();
        }
        if self.deck.is_empty() {
            return vec![(Card::ZERO.index(), 1.0)];
        }
        let total = self.deck.total() as f64;
        self.deck
            .remaining_counts()
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, &count)| (index, f64::from(count) / total))
            .collect()
    }

    fn legal_bids(&self, player: PlayerId, stop_turn: PlayerId) -> impl Iterator<Item = u8> {
        let committed: usize = self.bids.iter().map(|&b| usize::from(b)).sum();
        let round = self.round_number;
        let hooked = player == stop_turn;
        (0..=round as u8).filter(move |&bid| !(hooked && committed + usize::from(bid) == round))
    }

    fn legal_cards(&self, player: PlayerId) -> Vec<Card> {
        if self.current_trick.is_complete() {
            return Vec::new();
        }
        let hand = self.hand(player);
        let follow = self
            .current_trick
            .lead_suit()
            .filter(|&suit| hand.has_suit(suit));
        let mut cards: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|card| match follow {
                Some(suit) => card.suit().is_none_or(|s| s == suit),
                None => true,
            })
            .collect();
        cards.sort();
        cards.dedup();
        cards
    }

    /// Deals the card at `index` to the next seat, or reveals it as trump
    /// once every hand is full.
    pub fn deal_card(&mut self, index: usize) -> Result<DealOutcome, RoundError> {
        let RoundPhase::Dealing {
            deal_to,
            cards_dealt,
        } = self.phase
        else {
            return Err(RoundError::PhaseMismatch {
                operation: "dealing",
            });
        };

        if cards_dealt < self.cards_to_deal() {
            let card = self.deck.deal(index)?;
            self.hands[deal_to.index()].add(card);
            self.phase = RoundPhase::Dealing {
                deal_to: deal_to.next(self.num_players),
                cards_dealt: cards_dealt + 1,
            };
            trace!(player = deal_to.index(), %card, "dealt");
            return Ok(DealOutcome::Dealt { to: deal_to, card });
        }

        let trump = if self.deck.is_empty() {
            if index != Card::ZERO.index() {
                return Err(RoundError::IllegalAction {
                    action: index,
                    actor: Actor::Chance,
                });
            }
            Card::ZERO
        } else {
            self.deck.deal(index)?
        };
        self.trump = Some(trump);
        self.phase = RoundPhase::Bidding {
            turn: self.start_player,
            stop_turn: self.start_player.previous(self.num_players),
        };
        debug!(%trump, "trump revealed, bidding starts");
        Ok(DealOutcome::TrumpRevealed(trump))
    }

    /// Records the current bidder's guess. Returns `true` when this bid
    /// closes the bidding.
    pub fn guess_tricks(&mut self, bid: u8) -> Result<bool, RoundError> {
        let RoundPhase::Bidding { turn, stop_turn } = self.phase else {
            return Err(self.illegal(self.actions.bid(bid)));
        };
        if !self.legal_bids(turn, stop_turn).any(|legal| legal == bid) {
            return Err(self.illegal(self.actions.bid(bid)));
        }

        self.bids[turn.index()] = bid;
        trace!(player = turn.index(), bid, "bid placed");
        if turn == stop_turn {
            self.phase = RoundPhase::Tricking {
                turn: self.start_player,
                stop_turn,
            };
            self.current_trick = Trick::new(self.start_player, self.num_players);
            debug!(bids = ?self.bids, "bidding complete");
            Ok(true)
        } else {
            self.phase = RoundPhase::Bidding {
                turn: turn.next(self.num_players),
                stop_turn,
            };
            Ok(false)
        }
    }

    /// Plays `card` from the current player's hand.
    pub fn play_card(&mut self, card: Card) -> Result<PlayOutcome, RoundError> {
        let RoundPhase::Tricking { turn, stop_turn } = self.phase else {
            return Err(self.illegal(self.actions.play(card)));
        };
        if !self.legal_cards(turn).contains(&card) {
            return Err(self.illegal(self.actions.play(card)));
        }

        self.current_trick.play(turn, card)?;
        self.hands[turn.index()].remove(card);
        trace!(player = turn.index(), %card, "card played");

        if turn == stop_turn {
            Ok(PlayOutcome::TrickComplete)
        } else {
            self.phase = RoundPhase::Tricking {
                turn: turn.next(self.num_players),
                stop_turn,
            };
            Ok(PlayOutcome::Played)
        }
    }

    /// Resolves a complete trick, credits the winner and hands them the lead.
    pub fn update_tricks(&mut self) -> Result<PlayerId, RoundError> {
        let winner = match self.phase {
            RoundPhase::Tricking { .. } => self.current_trick.winner(self.trump_suit()),
            _ => None,
        }
        .ok_or(RoundError::PhaseMismatch {
            operation: "trick resolution",
        })?;

        self.tricks_won[winner.index()] += 1;
        let finished =
            std::mem::replace(&mut self.current_trick, Trick::new(winner, self.num_players));
        self.trick_history.push(finished);
        debug!(
            trick = self.trick_history.len(),
            winner = winner.index(),
            "trick resolved"
        );

        if self.trick_history.len() == self.round_number {
            self.phase = RoundPhase::Finished;
            debug!(tricks = ?self.tricks_won, bids = ?self.bids, "round finished");
        } else {
            self.phase = RoundPhase::Tricking {
                turn: winner,
                stop_turn: winner.previous(self.num_players),
            };
        }
        Ok(winner)
    }

    /// Applies any action id for the current actor, resolving the trick
    /// when the action completes one.
    pub fn apply_action(&mut self, action: Action) -> Result<(), RoundError> {
        match self.phase {
            RoundPhase::Dealing { .. } => {
                self.deal_card(action)?;
            }
            RoundPhase::Bidding { .. } => match self.actions.decode(action) {
                Some(PlayerAction::Bid(bid)) => {
                    self.guess_tricks(bid)?;
                }
                _ => return Err(self.illegal(action)),
            },
            RoundPhase::Tricking { .. } => match self.actions.decode(action) {
                Some(PlayerAction::Play(card)) => {
                    if self.play_card(card)? == PlayOutcome::TrickComplete {
                        self.update_tricks()?;
                    }
                }
                _ => return Err(self.illegal(action)),
            },
            RoundPhase::Finished => return Err(self.illegal(action)),
        }
        Ok(())
    }

    /// Per-player payoff, all zero until the round is over.
    pub fn rewards(&self, mode: RewardMode) -> Vec<f64> {
        if !self.is_final() {
            return vec![0.0; self.num_players];
        }
        score::rewards(&self.bids, &self.tricks_won, mode)
    }

    fn illegal(&self, action: Action) -> RoundError {
        RoundError::IllegalAction {
            action,
            actor: self.current_actor(),
        }
    }
}
