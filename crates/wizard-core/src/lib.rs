//! Rules engine for a trick-taking game with bidding: a round is dealt,
//! every player guesses how many tricks they will take, the tricks are
//! played out under follow-suit and trump rules, and scores reward an exact
//! guess. Drivers interact through the [`game::Game`] trait; search code can
//! redraw hidden hands with [`game::resample_from_infostate`].

pub mod game;
pub mod model;

pub use game::{Game, GameConfig, WizardState};
pub use model::card::Card;
pub use model::player::{Actor, PlayerId};
pub use model::round::{RoundError, RoundState};
