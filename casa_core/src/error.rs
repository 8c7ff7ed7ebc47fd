use thiserror::Error;

/// Failure of a single spin request. Nothing about the session changes when
/// this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("invalid bet {bet}: must be positive and no more than the balance of {balance}")]
    InvalidBet { bet: i64, balance: u64 },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("symbol table is empty")]
    Empty,
    #[error("symbol {0} appears more than once")]
    Duplicate(String),
    #[error("symbol {id} has invalid multiplier {value}")]
    Multiplier { id: String, value: f64 },
    #[error("symbol {id} has probability {value} outside (0, 1]")]
    Probability { id: String, value: f64 },
    #[error("symbol probabilities sum to {0}, expected 1")]
    Sum(f64),
    #[error("invalid symbol table json: {0}")]
    Json(#[from] serde_json::Error),
}
