use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use casa_core::{EngineParams, JackpotModel, SymbolTable};
use clap::{Args, ValueEnum};
use tracing::info;

use crate::machine::{AnimationConfig, DrawSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JackpotArg {
    /// Rarest symbol on all three reels.
    RarestTriple,
    /// Any three of a kind.
    AnyTriple,
}

impl From<JackpotArg> for JackpotModel {
    fn from(arg: JackpotArg) -> Self {
        match arg {
            JackpotArg::RarestTriple => JackpotModel::RarestTriple,
            JackpotArg::AnyTriple => JackpotModel::AnyTriple,
        }
    }
}

/// Options shared by every subcommand that needs an engine.
#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    /// JSON symbol table: [{"id", "multiplier", "probability"}, ...]
    #[arg(long, value_parser, env = "CASA_TABLE", global = true)]
    pub table: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        env = "CASA_JACKPOT_MODEL",
        default_value = "rarest-triple",
        global = true
    )]
    pub jackpot_model: JackpotArg,
}

impl EngineArgs {
    pub fn load(&self) -> anyhow::Result<EngineParams> {
        let table = match &self.table {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading symbol table {}", path.display()))?;
                let table = SymbolTable::from_json(&json)
                    .with_context(|| format!("loading symbol table {}", path.display()))?;
                info!(path = %path.display(), symbols = table.len(), "loaded symbol table");
                table
            }
            None => SymbolTable::classic(),
        };
        Ok(EngineParams::new(table, self.jackpot_model.into()))
    }
}

#[derive(Debug, Clone, Args)]
pub struct MachineArgs {
    /// Secret server seed; together with --client-seed makes final draws verifiable
    #[arg(long, env = "CASA_SERVER_SEED", requires = "client_seed", global = true)]
    pub server_seed: Option<String>,
    #[arg(long, env = "CASA_CLIENT_SEED", requires = "server_seed", global = true)]
    pub client_seed: Option<String>,
    /// Length of the reel animation
    #[arg(long, env = "CASA_SPIN_MS", default_value_t = 2000, global = true)]
    pub spin_ms: u64,
    /// Delay between animation frames
    #[arg(long, env = "CASA_FRAME_MS", default_value_t = 100, global = true)]
    pub frame_ms: u64,
    /// Pause between the reels landing and the result
    #[arg(long, env = "CASA_SETTLE_MS", default_value_t = 500, global = true)]
    pub settle_ms: u64,
}

impl MachineArgs {
    pub fn animation(&self) -> AnimationConfig {
        AnimationConfig {
            duration: Duration::from_millis(self.spin_ms),
            interval: Duration::from_millis(self.frame_ms.max(1)),
            settle: Duration::from_millis(self.settle_ms),
        }
    }

    pub fn draw_source(&self) -> DrawSource {
        match (&self.server_seed, &self.client_seed) {
            (Some(server), Some(client)) => DrawSource::seeded(server.clone(), client.clone()),
            _ => DrawSource::entropy(),
        }
    }
}
