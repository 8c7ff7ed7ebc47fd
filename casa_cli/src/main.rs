use casa_core::{
    expected_return, house_edge, pair_probability, simulate, triple_probability, verify_spin,
    JackpotModel, SimulationConfig, INITIAL_BALANCE,
};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

mod config;
mod export;
mod machine;
mod play;
mod view;

use config::{EngineArgs, MachineArgs};

#[derive(Parser)]
#[command(name = "casa", about = "Educational slot machine: the house always wins")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    engine: EngineArgs,
    #[command(flatten)]
    machine: MachineArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively (default)
    Play,
    /// Print the payout table and the odds behind it
    Table,
    /// Spin many times at a fixed bet and report what happened
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        spins: u64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        bet: i64,
        #[arg(long, default_value_t = INITIAL_BALANCE)]
        balance: u64,
        /// Refill the balance instead of stopping when it runs out
        #[arg(long)]
        keep_going: bool,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Check revealed seeds against the reels of a past spin
    Verify {
        /// The revealed server seed
        server: String,
        client: String,
        /// Nonce reported with the spin
        nonce: u64,
        /// Three symbol ids, left to right
        #[arg(num_args = 3, required = true)]
        reels: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let params = cli.engine.load()?;

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            let machine = &cli.machine;
            play::run(params, machine.draw_source(), machine.animation()).await?;
        }
        Commands::Table => {
            play::print_table(&params);
            let table = &params.table;
            println!("three of a kind: {:.4}%", triple_probability(table) * 100.0);
            println!("two of a kind:   {:.4}%", pair_probability(table) * 100.0);
            println!("expected return: {:.4}%", expected_return(table) * 100.0);
            println!(
                "jackpot per spin: {:.6}% (rarest triple), {:.4}% (any triple)",
                JackpotModel::RarestTriple.per_spin(table) * 100.0,
                JackpotModel::AnyTriple.per_spin(table) * 100.0
            );
            println!("house edge:      {:.4}%", house_edge(table) * 100.0);
        }
        Commands::Simulate {
            spins,
            bet,
            balance,
            keep_going,
            seed,
            json,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let config = SimulationConfig {
                bet,
                spins,
                initial_balance: balance,
                stop_when_busted: !keep_going,
            };
            let report = simulate(&params, &mut rng, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("spins played:     {}", report.spins);
                println!("total wagered:    ${}", report.total_wagered);
                println!("total paid:       ${}", report.total_paid);
                println!(
                    "three / two / none: {} / {} / {}",
                    report.triples, report.pairs, report.misses
                );
                println!("jackpots:         {}", report.jackpots);
                println!("final balance:    ${}", report.final_balance);
                if let Some(at) = report.busted_at {
                    println!("ran out after:    {at} spins");
                }
                println!(
                    "return: {:.2}% observed, {:.2}% expected",
                    report.empirical_return * 100.0,
                    report.expected_return * 100.0
                );
                println!("house edge:       {:.2}%", report.house_edge() * 100.0);
                println!("jackpot chance:   {:.4}%", report.jackpot_probability);
            }
        }
        Commands::Verify {
            server,
            client,
            nonce,
            reels,
        } => {
            let expected = [reels[0].as_str(), reels[1].as_str(), reels[2].as_str()];
            let ok = verify_spin(&server, &client, nonce, &params.table, &expected);
            println!(
                "server seed hash: {}",
                casa_core::derive_hash_hex(server.as_bytes())
            );
            if ok {
                println!("spin {nonce} verified: {}", reels.join(" "));
            } else {
                anyhow::bail!("spin {nonce} does not match the seeds");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_play_with_classic_timing() {
        let cli = Cli::try_parse_from(["casa"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.machine.animation(), machine::AnimationConfig::default());
        assert!(cli.engine.table.is_none());
        assert_eq!(cli.engine.load().unwrap().jackpot, JackpotModel::RarestTriple);
    }

    #[test]
    fn seeds_must_come_in_pairs() {
        assert!(Cli::try_parse_from(["casa", "--server-seed", "s"]).is_err());
        let cli =
            Cli::try_parse_from(["casa", "play", "--server-seed", "s", "--client-seed", "c"])
                .unwrap();
        assert!(matches!(
            cli.machine.draw_source(),
            machine::DrawSource::Seeded { .. }
        ));
    }

    #[test]
    fn parses_verify_and_simulate() {
        let cli = Cli::try_parse_from([
            "casa", "verify", "srv", "cli", "3", "CEREJA", "LIMAO", "SINO",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Verify { nonce, reels, .. }) => {
                assert_eq!(nonce, 3);
                assert_eq!(reels, vec!["CEREJA", "LIMAO", "SINO"]);
            }
            _ => panic!("expected verify"),
        }
        let cli = Cli::try_parse_from([
            "casa",
            "simulate",
            "--spins",
            "50",
            "--bet",
            "-1",
            "--jackpot-model",
            "any-triple",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Simulate { spins: 50, bet: -1, .. })
        ));
        assert_eq!(cli.engine.load().unwrap().jackpot, JackpotModel::AnyTriple);
    }
}
