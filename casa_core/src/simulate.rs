//! Batch play at a fixed bet, to show how the balance and the jackpot odds
//! evolve over many spins.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    engine::{resolve_spin, validate_bet, EngineParams},
    error::SpinError,
    paytable::Combination,
    probability::expected_return,
    session::INITIAL_BALANCE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub bet: i64,
    pub spins: u64,
    pub initial_balance: u64,
    /// Stop at the first spin the balance cannot cover. When false the
    /// balance is topped back up to `initial_balance` instead, so the
    /// long-run return can be measured.
    pub stop_when_busted: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bet: 10,
            spins: 10_000,
            initial_balance: INITIAL_BALANCE,
            stop_when_busted: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub spins: u64,
    pub total_wagered: u64,
    pub total_paid: u64,
    pub triples: u64,
    pub pairs: u64,
    pub misses: u64,
    pub jackpots: u64,
    pub final_balance: u64,
    /// Spin count at which the balance first fell below the bet.
    pub busted_at: Option<u64>,
    pub empirical_return: f64,
    pub expected_return: f64,
    pub jackpot_probability: f64,
}

impl SimulationReport {
    pub fn house_edge(&self) -> f64 {
        1.0 - self.empirical_return
    }
}

pub fn simulate<R: Rng + ?Sized>(
    params: &EngineParams,
    rng: &mut R,
    config: SimulationConfig,
) -> Result<SimulationReport, SpinError> {
    validate_bet(config.bet, config.initial_balance)?;
    let jackpot_id = params.table.rarest().id.clone();
    // Only the running balance and play count are kept; no per-spin history.
    let mut balance = config.initial_balance;
    let mut play_count = 0;

    let mut report = SimulationReport {
        expected_return: expected_return(&params.table),
        ..Default::default()
    };
    for _ in 0..config.spins {
        if validate_bet(config.bet, balance).is_err() {
            report.busted_at.get_or_insert(report.spins);
            if config.stop_when_busted {
                break;
            }
            balance = balance.max(config.initial_balance);
        }
        let res = resolve_spin(params, rng, config.bet, balance, play_count)?;
        balance = res.new_balance;
        play_count = res.new_play_count;
        report.spins += 1;
        report.total_wagered += res.bet;
        report.total_paid += res.winnings;
        match &res.combination {
            Combination::Triple(id) => {
                report.triples += 1;
                if *id == jackpot_id {
                    report.jackpots += 1;
                }
            }
            Combination::Pair => report.pairs += 1,
            Combination::Miss => report.misses += 1,
        }
    }
    report.final_balance = balance;
    report.jackpot_probability = params.jackpot_probability(report.spins);
    if report.total_wagered > 0 {
        report.empirical_return = report.total_paid as f64 / report.total_wagered as f64;
    }
    info!(
        spins = report.spins,
        rtp = report.empirical_return,
        busted_at = ?report.busted_at,
        "simulation finished"
    );
    Ok(report)
}
