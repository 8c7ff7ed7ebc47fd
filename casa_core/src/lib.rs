pub mod engine;
pub mod error;
pub mod paytable;
pub mod probability;
pub mod rng;
pub mod session;
pub mod simulate;
pub mod symbols;

pub use crate::engine::{
    draw_reels, draw_symbol, resolve_spin, spin_with_seeds, symbol_at, validate_bet, verify_spin,
    EngineParams, SpinResolution,
};
pub use crate::error::{SpinError, TableError};
pub use crate::paytable::{classify, evaluate_payout, Combination, Reels, PAIR_MULTIPLIER, REELS};
pub use crate::probability::{
    cumulative_jackpot_probability, cumulative_probability, expected_return, house_edge,
    pair_probability, triple_probability, JackpotModel,
};
pub use crate::rng::{derive_hash_hex, ProvablyFairRng};
pub use crate::session::{SessionState, BUSTED_MESSAGE, DEFAULT_BET, INITIAL_BALANCE};
pub use crate::simulate::{simulate, SimulationConfig, SimulationReport};
pub use crate::symbols::{Symbol, SymbolTable, PROBABILITY_TOLERANCE};
