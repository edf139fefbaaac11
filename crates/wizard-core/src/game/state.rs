use super::config::GameConfig;
use super::resample::{ResampleError, resample_from_infostate};
use super::Game;
use crate::model::action::{Action, PlayerAction};
use crate::model::card::Card;
use crate::model::player::{Actor, PlayerId};
use crate::model::round::{RoundError, RoundState};
use rand::Rng;
use std::fmt::Write as _;

/// One applied action together with who took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub actor: Actor,
    pub action: Action,
}

/// A round plus the full action history that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    round: RoundState,
    history: Vec<HistoryEntry>,
}

impl WizardState {
    pub fn new(config: &GameConfig) -> Result<Self, RoundError> {
        Ok(Self {
            round: RoundState::new(config)?,
            history: Vec::with_capacity(config.max_game_length()),
        })
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn config(&self) -> GameConfig {
        self.round.config()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn move_number(&self) -> usize {
        self.history.len()
    }

    /// Legal actions for a specific seat; empty unless it is that seat's turn.
    pub fn legal_actions_for(&self, player: PlayerId) -> Vec<Action> {
        self.round.legal_actions_for(player)
    }

    /// Renders an action as taken by `actor`: dealt cards and played cards
    /// use the card string, bids are plain numbers.
    pub fn action_to_string(&self, actor: Actor, action: Action) -> String {
        if actor == Actor::Chance {
            return Card::from_index(action)
                .map(|card| card.to_string())
                .unwrap_or_else(|| format!("invalid deal {action}"));
        }
        match self.round.action_space().decode(action) {
            Some(PlayerAction::Bid(bid)) => bid.to_string(),
            Some(PlayerAction::Play(card)) => card.to_string(),
            None => format!("invalid action {action}"),
        }
    }

    /// Comma-separated `(actor, action)` pairs.
    pub fn history_string(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.history.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "({}, {})", entry.actor.id(), entry.action);
        }
        out
    }

    /// Redraws every card hidden from `observer` while keeping the public
    /// history identical. See [`resample_from_infostate`].
    pub fn resample<R: Rng + ?Sized>(
        &self,
        observer: PlayerId,
        rng: &mut R,
    ) -> Result<WizardState, ResampleError> {
        resample_from_infostate(self, observer, rng)
    }
}

impl Game for WizardState {
    type Error = RoundError;

    fn num_players(&self) -> usize {
        self.round.num_players()
    }

    fn current_actor(&self) -> Actor {
        self.round.current_actor()
    }

    fn legal_actions(&self) -> Vec<Action> {
        self.round.legal_actions()
    }

    fn chance_outcomes(&self) -> Vec<(Action, f64)> {
        self.round.chance_outcomes()
    }

    fn apply_action(&mut self, action: Action) -> Result<(), RoundError> {
        let actor = self.round.current_actor();
        self.round.apply_action(action)?;
        self.history.push(HistoryEntry { actor, action });
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.round.is_final()
    }

    fn returns(&self) -> Vec<f64> {
        self.round.rewards(self.round.reward_mode())
    }
}
