//! Property tests for card identities, trick resolution and information-set
//! resampling.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use wizard_core::game::{Game, GameConfig, WizardState};
use wizard_core::model::card::{Card, NUM_DISTINCT_CARDS};
use wizard_core::model::deck::{DECK_SIZE, Deck};
use wizard_core::model::player::PlayerId;

fn config_strategy() -> impl Strategy<Value = GameConfig> {
    (3usize..=6).prop_flat_map(|players| {
        (Just(players), 1..=DECK_SIZE / players, 0..players).prop_map(
            |(players, round, start)| GameConfig::new(players, round).with_start_player(start),
        )
    })
}

fn random_prefix(config: GameConfig, fraction: f64, seed: u64) -> WizardState {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = WizardState::new(&config).unwrap();
    let steps = (config.max_game_length() as f64 * fraction) as usize;
    for _ in 0..steps {
        if state.is_terminal() {
            break;
        }
        let action = *state.legal_actions().choose(&mut rng).unwrap();
        state.apply_action(action).unwrap();
    }
    state
}

/// Copies per card index across hands, resolved tricks, the cards on the
/// table, the deck and a dealt trump.
fn card_census(state: &WizardState) -> [u32; NUM_DISTINCT_CARDS] {
    let round = state.round();
    let mut census = [0u32; NUM_DISTINCT_CARDS];
    for (index, &count) in round.deck().remaining_counts().iter().enumerate() {
        census[index] += u32::from(count);
    }
    for card in round.hands().iter().flat_map(|hand| hand.iter()) {
        census[card.index()] += 1;
    }
    for play in round.cards_played().chain(round.current_trick().plays()) {
        census[play.card.index()] += 1;
    }
    if let Some(trump) = round.trump() {
        if round.cards_to_deal() < DECK_SIZE {
            census[trump.index()] += 1;
        }
    }
    census
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn card_index_and_text_agree(index in 0..NUM_DISTINCT_CARDS) {
        let card = Card::from_index(index).unwrap();
        prop_assert_eq!(card.index(), index);
        let parsed: Card = card.to_string().parse().unwrap();
        prop_assert_eq!(parsed, card);
    }

    #[test]
    fn trick_winner_played_into_the_trick(
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let state = random_prefix(config, 1.0, seed);
        let round = state.round();
        for trick in round.trick_history() {
            prop_assert_eq!(trick.plays().len(), config.players);
            let winner = trick.winner(round.trump_suit()).unwrap();
            prop_assert!(trick.plays().iter().any(|play| play.player == winner));
        }
        for (index, trick) in round.trick_history().iter().enumerate().skip(1) {
            let previous = &round.trick_history()[index - 1];
            prop_assert_eq!(Some(trick.leader()), previous.winner(round.trump_suit()));
        }
    }

    #[test]
    fn resampled_states_match_the_public_history(
        config in config_strategy(),
        fraction in 0.0f64..1.0,
        observer in 0usize..6,
        seed in any::<u64>(),
    ) {
        let observer = PlayerId::new((observer % config.players) as u8);
        let state = random_prefix(config, fraction, seed);
        let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
        let resampled = state.resample(observer, &mut rng).unwrap();

        prop_assert_eq!(resampled.move_number(), state.move_number());
        let dealt = state.round().cards_dealt();
        for (ours, theirs) in resampled.history().iter().zip(state.history()) {
            prop_assert_eq!(ours.actor, theirs.actor);
        }
        prop_assert_eq!(&resampled.history()[dealt..], &state.history()[dealt..]);
        prop_assert_eq!(
            resampled.round().hand(observer),
            state.round().hand(observer)
        );
        prop_assert_eq!(resampled.current_actor(), state.current_actor());
        prop_assert_eq!(
            resampled.legal_actions_for(observer),
            state.legal_actions_for(observer)
        );
        prop_assert_eq!(card_census(&resampled), card_census(&state));
        let standard = Deck::standard().remaining_counts().map(u32::from);
        prop_assert_eq!(card_census(&state), standard);
    }
}
