pub mod config;
mod resample;
mod state;

use crate::model::action::Action;
use crate::model::player::Actor;

pub use config::{ConfigError, GameConfig};
pub use resample::{ResampleError, resample_from_infostate};
pub use state::{HistoryEntry, WizardState};

/// Turn-taking surface a driver needs: who acts, what they may do, how to
/// apply it, and the payoff once the game is over.
pub trait Game: Clone {
    type Error: std::error::Error;

    fn num_players(&self) -> usize;

    fn current_actor(&self) -> Actor;

    /// Legal action ids for the current actor, in ascending order.
    fn legal_actions(&self) -> Vec<Action>;

    /// Outcome distribution at chance nodes; empty elsewhere.
    fn chance_outcomes(&self) -> Vec<(Action, f64)>;

    fn apply_action(&mut self, action: Action) -> Result<(), Self::Error>;

    fn is_terminal(&self) -> bool;

    /// Per-player payoff. Only meaningful once [`Game::is_terminal`] holds.
    fn returns(&self) -> Vec<f64>;

    fn is_chance_node(&self) -> bool {
        self.current_actor() == Actor::Chance
    }
}
