use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::SpinError,
    paytable::{classify, evaluate_payout, Combination, Reels},
    probability::{cumulative_probability, JackpotModel},
    rng::ProvablyFairRng,
    symbols::{Symbol, SymbolTable},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub table: SymbolTable,
    pub jackpot: JackpotModel,
}

impl EngineParams {
    pub fn new(table: SymbolTable, jackpot: JackpotModel) -> Self {
        Self { table, jackpot }
    }

    /// Cumulative jackpot chance (percent) after `play_count` spins under
    /// this engine's jackpot model.
    pub fn jackpot_probability(&self, play_count: u64) -> f64 {
        cumulative_probability(self.jackpot.per_spin(&self.table), play_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResolution {
    pub reels: Reels,
    pub combination: Combination,
    pub bet: u64,
    pub winnings: u64,
    pub new_balance: u64,
    pub new_play_count: u64,
    /// Cumulative jackpot probability in percent for `new_play_count`.
    pub probability_sample: f64,
}

/// Inverse-CDF lookup of `r` in [0, 1) against the table order.
pub fn symbol_at(table: &SymbolTable, r: f64) -> &Symbol {
    let mut cumulative = 0.0;
    for sym in table.symbols() {
        cumulative += sym.probability;
        if cumulative >= r {
            return sym;
        }
    }
    // rounding left the running sum just short of r
    table.first()
}

pub fn draw_symbol<'t, R: Rng + ?Sized>(table: &'t SymbolTable, rng: &mut R) -> &'t Symbol {
    symbol_at(table, rng.gen::<f64>())
}

/// Three independent draws, one per reel.
pub fn draw_reels<R: Rng + ?Sized>(table: &SymbolTable, rng: &mut R) -> Reels {
    std::array::from_fn(|_| draw_symbol(table, rng).clone())
}

/// A bet is playable when it is positive and covered by the balance.
pub fn validate_bet(bet: i64, balance: u64) -> Result<u64, SpinError> {
    u64::try_from(bet)
        .ok()
        .filter(|stake| *stake > 0 && *stake <= balance)
        .ok_or(SpinError::InvalidBet { bet, balance })
}

pub fn resolve_spin<R: Rng + ?Sized>(
    params: &EngineParams,
    rng: &mut R,
    bet: i64,
    balance: u64,
    play_count: u64,
) -> Result<SpinResolution, SpinError> {
    let stake = validate_bet(bet, balance)?;
    let after_stake = balance - stake;
    let reels = draw_reels(&params.table, rng);
    let combination = classify(&reels);
    let winnings = evaluate_payout(&reels, stake);
    let new_balance = after_stake.saturating_add(winnings);
    let new_play_count = play_count + 1;
    let probability_sample = params.jackpot_probability(new_play_count);
    debug!(stake, winnings, new_balance, new_play_count, ?combination, "spin resolved");
    Ok(SpinResolution {
        reels,
        combination,
        bet: stake,
        winnings,
        new_balance,
        new_play_count,
        probability_sample,
    })
}

/// Convenience: resolve a spin with the provably-fair stream for `nonce`.
pub fn spin_with_seeds(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    params: &EngineParams,
    bet: i64,
    balance: u64,
) -> Result<SpinResolution, SpinError> {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    resolve_spin(params, &mut rng, bet, balance, nonce.saturating_sub(1))
}

/// Check that `expected` are the reels the seeds produce for `nonce`.
pub fn verify_spin(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    table: &SymbolTable,
    expected: &[&str; 3],
) -> bool {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    let reels = draw_reels(table, &mut rng);
    reels.iter().zip(expected).all(|(s, id)| s.id == *id)
}
