//! Information-set resampling.
//!
//! Given a history and one observer, rebuild a round that the observer
//! cannot tell apart from the real one: the public trace (trump, bids, every
//! card played) is replayed verbatim, the observer's own deals are kept, and
//! every other deal is redrawn from the cards the observer has not seen.

use super::Game;
use super::state::WizardState;
use crate::model::card::{Card, NUM_DISTINCT_CARDS};
use crate::model::player::PlayerId;
use crate::model::round::{RoundError, RoundState};
use crate::model::suit::Suit;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use thiserror::Error;
use tracing::debug;

/// Card categories used for feasibility checks: four suits plus specials.
const CATEGORIES: usize = 5;
const SPECIALS: usize = 4;

#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("observer {observer} is not seated at a table of {players}")]
    UnknownObserver { observer: PlayerId, players: usize },
    #[error("no card left that player {player} could have been dealt")]
    Inconsistent { player: PlayerId },
    #[error("replaying the public history failed: {0}")]
    Replay(#[from] RoundError),
}

/// Everything the observer can infer about the other hands.
struct HiddenInfo {
    /// Undealt cards plus the cards still held by other players.
    pool: [u32; NUM_DISTINCT_CARDS],
    /// Cards each player has played, in play order.
    played: Vec<Vec<Card>>,
    /// Suits each player has shown to be out of, via a failure to follow.
    voids: Vec<[bool; 4]>,
    /// Number of unplayed cards each other player holds.
    hidden: Vec<usize>,
}

impl HiddenInfo {
    fn collect(round: &RoundState, observer: PlayerId) -> Self {
        let num_players = round.num_players();
        let mut pool = [0u32; NUM_DISTINCT_CARDS];
        for (index, &count) in round.deck().remaining_counts().iter().enumerate() {
            pool[index] = u32::from(count);
        }

        let mut hidden = vec![0; num_players];
        for player in PlayerId::all(num_players).filter(|&p| p != observer) {
            let hand = round.hand(player);
            for card in hand.iter() {
                pool[card.index()] += 1;
            }
            hidden[player.index()] = hand.len();
        }

        let mut played = vec![Vec::new(); num_players];
        let mut voids = vec![[false; 4]; num_players];
        let tricks = round
            .trick_history()
            .iter()
            .chain(std::iter::once(round.current_trick()));
        for trick in tricks {
            let mut lead: Option<Suit> = None;
            let mut lead_fixed = false;
            for play in trick.plays() {
                if let (Some(led), Some(suit)) = (lead, play.card.suit()) {
                    if suit != led {
                        voids[play.player.index()][led.index()] = true;
                    }
                }
                if !lead_fixed && !play.card.is_zero() {
                    lead = play.card.suit();
                    lead_fixed = true;
                }
                played[play.player.index()].push(play.card);
            }
        }

        Self {
            pool,
            played,
            voids,
            hidden,
        }
    }

    fn allows(&self, player: usize, category: usize) -> bool {
        category == SPECIALS || !self.voids[player][category]
    }

    /// Whether every remaining demand can still be met from `supply`. With
    /// one source per card category this is Hall's condition over every
    /// subset of players.
    fn feasible(&self, supply: &[u32; CATEGORIES], demand: &[usize]) -> bool {
        let players = demand.len();
        (1u32..1 << players).all(|subset| {
            let members = || (0..players).filter(move |p| subset & (1 << p) != 0);
            let needed: usize = members().map(|p| demand[p]).sum();
            let available: usize = (0..CATEGORIES)
                .filter(|&c| members().any(|p| self.allows(p, c)))
                .map(|c| supply[c] as usize)
                .sum();
            needed <= available
        })
    }

    /// Draws the hidden cards of every other player. Each draw is weighted by
    /// remaining copies among the cards that keep the rest of the deal
    /// satisfiable, so a consistent history never dead-ends.
    fn assign<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Vec<Card>>, ResampleError> {
        let mut pool = self.pool;
        let mut supply = [0u32; CATEGORIES];
        for (index, &count) in pool.iter().enumerate() {
            supply[category_of(index)] += count;
        }
        let mut demand = self.hidden.clone();
        let mut assigned = vec![Vec::new(); demand.len()];

        for player in 0..demand.len() {
            while demand[player] > 0 {
                demand[player] -= 1;
                let mut open = [false; CATEGORIES];
                for category in 0..CATEGORIES {
                    if supply[category] == 0 || !self.allows(player, category) {
                        continue;
                    }
                    supply[category] -= 1;
                    open[category] = self.feasible(&supply, &demand);
                    supply[category] += 1;
                }

                let candidates: Vec<(usize, u32)> = pool
                    .iter()
                    .enumerate()
                    .filter(|&(index, &count)| count > 0 && open[category_of(index)])
                    .map(|(index, &count)| (index, count))
                    .collect();
                let weights = WeightedIndex::new(candidates.iter().map(|&(_, w)| w))
                    .map_err(|_| ResampleError::Inconsistent {
                        player: PlayerId::new(player as u8),
                    })?;
                let (index, _) = candidates[weights.sample(rng)];
                pool[index] -= 1;
                supply[category_of(index)] -= 1;
                let card = Card::from_index(index).ok_or(ResampleError::Inconsistent {
                    player: PlayerId::new(player as u8),
                })?;
                assigned[player].push(card);
            }
        }
        Ok(assigned)
    }
}

/// Suits map to their own index; both specials share the last slot.
fn category_of(index: usize) -> usize {
    Card::from_index(index)
        .and_then(Card::suit)
        .map_or(SPECIALS, Suit::index)
}

/// Builds a new state whose public history matches `state` action for
/// action, whose `observer` hand is unchanged, and whose other hands are
/// redrawn from the unseen cards.
///
/// Cards a player has already played are dealt back to them, and their
/// remaining cards avoid any suit they have shown to be out of, so the
/// replayed card plays stay legal.
pub fn resample_from_infostate<R: Rng + ?Sized>(
    state: &WizardState,
    observer: PlayerId,
    rng: &mut R,
) -> Result<WizardState, ResampleError> {
    let round = state.round();
    let num_players = round.num_players();
    if observer.index() >= num_players {
        return Err(ResampleError::UnknownObserver {
            observer,
            players: num_players,
        });
    }

    let info = HiddenInfo::collect(round, observer);
    let mut hidden = info.assign(rng)?;

    let mut played = info.played.clone();
    let mut clone = WizardState::new(&state.config())?;
    let history = state.history();
    let dealt = round.cards_dealt().min(history.len());
    let mut deal_to = round.start_player();
    let mut redrawn = 0usize;

    for entry in &history[..dealt] {
        let seat = deal_to.index();
        let action = if deal_to == observer {
            entry.action
        } else if let Some(card) = played[seat].pop() {
            card.index()
        } else {
            redrawn += 1;
            hidden[seat]
                .pop()
                .map(Card::index)
                .ok_or(ResampleError::Inconsistent { player: deal_to })?
        };
        clone.apply_action(action)?;
        deal_to = deal_to.next(num_players);
    }

    for entry in &history[dealt..] {
        clone.apply_action(entry.action)?;
    }

    debug!(
        observer = observer.index(),
        redrawn, "resampled information state"
    );
    Ok(clone)
}
