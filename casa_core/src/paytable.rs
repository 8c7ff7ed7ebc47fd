use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

pub const REELS: usize = 3;

/// Symbols showing on the payline after a spin, left to right.
pub type Reels = [Symbol; REELS];

// Two of a kind pays 3/2 of the bet, rounded down.
const PAIR_NUMERATOR: u64 = 3;
const PAIR_DENOMINATOR: u64 = 2;
pub const PAIR_MULTIPLIER: f64 = PAIR_NUMERATOR as f64 / PAIR_DENOMINATOR as f64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combination {
    /// All three reels show this symbol id.
    Triple(String),
    Pair,
    Miss,
}

pub fn classify(reels: &Reels) -> Combination {
    let [a, b, c] = reels;
    if a.id == b.id && b.id == c.id {
        Combination::Triple(a.id.clone())
    } else if a.id == b.id || a.id == c.id || b.id == c.id {
        Combination::Pair
    } else {
        Combination::Miss
    }
}

pub fn evaluate_payout(reels: &Reels, bet: u64) -> u64 {
    match classify(reels) {
        Combination::Triple(_) => scale(bet, reels[0].multiplier),
        Combination::Pair => bet.saturating_mul(PAIR_NUMERATOR) / PAIR_DENOMINATOR,
        Combination::Miss => 0,
    }
}

// Relative slack absorbs the representation error of decimal multipliers
// (2.3 is stored as 2.29999...), which would otherwise floor one unit short.
const FLOOR_SLACK: f64 = 1e-12;

fn scale(bet: u64, multiplier: f64) -> u64 {
    let product = bet as f64 * multiplier;
    (product + product.abs() * FLOOR_SLACK).floor() as u64
}
