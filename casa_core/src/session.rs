use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    engine::{resolve_spin, validate_bet, EngineParams, SpinResolution},
    error::SpinError,
    paytable::Reels,
};

pub const INITIAL_BALANCE: u64 = 1000;
pub const DEFAULT_BET: i64 = 10;

pub const BUSTED_MESSAGE: &str = "You lost everything! The house always wins.";

/// Player state for one machine. Owned by whatever front end drives the
/// machine; the engine only reads it and hands back new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    initial_balance: u64,
    balance: u64,
    bet: i64,
    play_count: u64,
    balance_history: Vec<u64>,
    jackpot_history: Vec<f64>,
    last_spin: Option<SpinResolution>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::with_balance(INITIAL_BALANCE)
    }

    pub fn with_balance(initial_balance: u64) -> Self {
        Self {
            initial_balance,
            balance: initial_balance,
            bet: DEFAULT_BET,
            play_count: 0,
            balance_history: vec![initial_balance],
            jackpot_history: vec![0.0],
            last_spin: None,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bet(&self) -> i64 {
        self.bet
    }

    pub fn play_count(&self) -> u64 {
        self.play_count
    }

    pub fn balance_history(&self) -> &[u64] {
        &self.balance_history
    }

    pub fn jackpot_history(&self) -> &[f64] {
        &self.jackpot_history
    }

    pub fn last_spin(&self) -> Option<&SpinResolution> {
        self.last_spin.as_ref()
    }

    pub fn last_reels(&self) -> Option<&Reels> {
        self.last_spin.as_ref().map(|s| &s.reels)
    }

    /// Winnings of the most recent spin, 0 before the first one.
    pub fn win_amount(&self) -> u64 {
        self.last_spin.as_ref().map_or(0, |s| s.winnings)
    }

    pub fn result_message(&self) -> Option<String> {
        self.last_spin.as_ref().map(|s| {
            if s.winnings > 0 {
                format!("You won ${}!", s.winnings)
            } else {
                "Try again!".to_string()
            }
        })
    }

    pub fn is_busted(&self) -> bool {
        self.balance == 0
    }

    pub fn set_bet(&mut self, bet: i64) {
        self.bet = bet;
    }

    pub fn validate_bet(&self) -> Result<u64, SpinError> {
        validate_bet(self.bet, self.balance)
    }

    /// Resolve one spin at the current bet and record it. On error nothing
    /// changes.
    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        params: &EngineParams,
        rng: &mut R,
    ) -> Result<SpinResolution, SpinError> {
        let resolution = resolve_spin(params, rng, self.bet, self.balance, self.play_count)?;
        self.apply(&resolution);
        Ok(resolution)
    }

    /// Record a resolved spin. Both histories grow on every spin, win or lose.
    pub fn apply(&mut self, resolution: &SpinResolution) {
        self.balance = resolution.new_balance;
        self.play_count = resolution.new_play_count;
        self.balance_history.push(resolution.new_balance);
        self.jackpot_history.push(resolution.probability_sample);
        self.last_spin = Some(resolution.clone());
        debug!(balance = self.balance, plays = self.play_count, "session updated");
    }

    pub fn reset(&mut self) {
        info!(balance = self.balance, plays = self.play_count, "session reset");
        *self = Self::with_balance(self.initial_balance);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
