use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a player can ask the machine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    SetBet(i64),
    Spin,
    Reset,
    Status,
    Table,
    History,
    Export(PathBuf),
    Help,
    Quit,
}

impl FromStr for UserAction {
    type Err = ActionParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            // an empty line pulls the lever
            return Ok(UserAction::Spin);
        };
        let arg = words.next();
        let action = match (cmd.to_ascii_lowercase().as_str(), arg) {
            ("bet" | "b", Some(n)) => UserAction::SetBet(
                n.parse()
                    .map_err(|_| ActionParseError::InvalidAmount(n.to_string()))?,
            ),
            ("bet" | "b", None) => return Err(ActionParseError::MissingArgument("bet")),
            ("spin" | "s", None) => UserAction::Spin,
            ("reset" | "r", None) => UserAction::Reset,
            ("status", None) => UserAction::Status,
            ("table", None) => UserAction::Table,
            ("history", None) => UserAction::History,
            ("export", Some(path)) => UserAction::Export(PathBuf::from(path)),
            ("export", None) => return Err(ActionParseError::MissingArgument("export")),
            ("help" | "?", None) => UserAction::Help,
            ("quit" | "exit" | "q", None) => UserAction::Quit,
            _ => return Err(ActionParseError::Unknown(line.trim().to_string())),
        };
        if words.next().is_some() {
            return Err(ActionParseError::Unknown(line.trim().to_string()));
        }
        Ok(action)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("not a whole number: {0}")]
    InvalidAmount(String),
}

/// One row of the static payout table shown next to the reels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRow {
    pub symbol: String,
    pub multiplier: f64,
    /// Percent.
    pub probability: f64,
}

/// Everything a front end needs to draw the machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub balance: u64,
    pub bet: i64,
    pub spinning: bool,
    pub reels: [String; 3],
    pub last_result: Option<String>,
    pub win_amount: u64,
    pub play_count: u64,
    pub balance_history: Vec<u64>,
    pub jackpot_history: Vec<f64>,
    /// Cumulative jackpot chance in percent after `play_count` spins.
    pub jackpot_probability: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinLogEntry {
    pub play: u64,
    pub ts: DateTime<Utc>,
    pub reels: [String; 3],
    pub bet: u64,
    pub winnings: u64,
    pub balance: u64,
    pub jackpot_probability: f64,
    /// Provably-fair nonce of the final draw, when seeds are in use.
    #[serde(default)]
    pub nonce: Option<u64>,
}
