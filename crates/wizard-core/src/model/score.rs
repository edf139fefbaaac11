use serde::{Deserialize, Serialize};

/// Base bonus for hitting a bid exactly.
const EXACT_BONUS: i32 = 20;
/// Points per trick taken on an exact bid, and per trick missed otherwise.
const POINTS_PER_TRICK: i32 = 10;

/// How terminal scores are reported to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Raw round score.
    #[default]
    Normal,
    /// +1 for a positive score, -1 otherwise.
    Binary,
}

impl RewardMode {
    pub fn min_utility(self, max_round: usize) -> f64 {
        match self {
            RewardMode::Binary => -1.0,
            RewardMode::Normal => (1..=max_round as i32)
                .map(|i| -POINTS_PER_TRICK * i)
                .sum::<i32>() as f64,
        }
    }

    pub fn max_utility(self, max_round: usize) -> f64 {
        match self {
            RewardMode::Binary => 1.0,
            RewardMode::Normal => (1..=max_round as i32)
                .map(|i| EXACT_BONUS + POINTS_PER_TRICK * i)
                .sum::<i32>() as f64,
        }
    }
}

/// Score for one player: `20 + 10 * tricks` on an exact bid, otherwise
/// `-10` per trick of difference.
pub fn round_score(bid: u8, tricks: u8) -> i32 {
    let diff = (i32::from(tricks) - i32::from(bid)).abs();
    if diff == 0 {
        EXACT_BONUS + POINTS_PER_TRICK * i32::from(tricks)
    } else {
        -POINTS_PER_TRICK * diff
    }
}

pub fn rewards(bids: &[u8], tricks: &[u8], mode: RewardMode) -> Vec<f64> {
    bids.iter()
        .zip(tricks)
        .map(|(&bid, &won)| {
            let score = round_score(bid, won);
            match mode {
                RewardMode::Normal => f64::from(score),
                RewardMode::Binary if score > 0 => 1.0,
                RewardMode::Binary => -1.0,
            }
        })
        .collect()
}
