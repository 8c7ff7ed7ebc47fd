use std::io::Write;

use casa_core::{house_edge, EngineParams, BUSTED_MESSAGE};
use casa_shared::{SessionView, SpinLogEntry, UserAction};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::export::export_csv;
use crate::machine::{AnimationConfig, DrawSource, MachineEvent, SpinController, SpinStatus};
use crate::view::payout_rows;

const HELP: &str = "\
commands:
  bet <n>        set the bet
  spin, <enter>  pull the lever
  reset          start over with $1000
  status         balance, bet and jackpot odds
  table          payout table
  history        balance and jackpot chart series
  export <path>  write the chart series as csv
  quit";

pub async fn run(
    params: EngineParams,
    source: DrawSource,
    animation: AnimationConfig,
) -> anyhow::Result<()> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let mut machine = SpinController::new(params, source, animation, tx);
    let mut log: Vec<SpinLogEntry> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("A Casa Sempre Ganha - educational slot machine");
    if let Some(hash) = machine.server_seed_hash().await {
        println!("server seed hash: {hash}");
    }
    print_table(machine.params());
    print_status(&machine.view().await);
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let action = match line.parse::<UserAction>() {
                    Ok(action) => action,
                    Err(err) => {
                        println!("{err} (try `help`)");
                        continue;
                    }
                };
                debug!(?action, "user action");
                match action {
                    UserAction::SetBet(bet) => {
                        if machine.set_bet(bet).await {
                            println!("bet: ${bet}");
                        } else {
                            println!("wait for the reels to stop");
                        }
                    }
                    UserAction::Spin => match machine.request_spin().await {
                        Ok(SpinStatus::Started) => {}
                        Ok(SpinStatus::Busy) => println!("already spinning"),
                        Err(err) => println!("Invalid bet! {err}"),
                    },
                    UserAction::Reset => {
                        machine.reset().await;
                        log.clear();
                        println!();
                        print_status(&machine.view().await);
                    }
                    UserAction::Status => print_status(&machine.view().await),
                    UserAction::Table => print_table(machine.params()),
                    UserAction::History => print_history(&machine.view().await),
                    UserAction::Export(path) => {
                        match export_csv(&path, &machine.view().await, &log) {
                            Ok(rows) => println!("exported {rows} rows to {}", path.display()),
                            Err(err) => println!("export failed: {err:#}"),
                        }
                    }
                    UserAction::Help => println!("{HELP}"),
                    UserAction::Quit => break,
                }
            }
            Some(message) = events.recv() => {
                let Some(event) = machine.accept(message) else { continue };
                match event {
                    MachineEvent::Frame(reels) => {
                        print!("\r  [ {:^8} | {:^8} | {:^8} ]  spinning...", reels[0], reels[1], reels[2]);
                        std::io::stdout().flush()?;
                    }
                    MachineEvent::Landed(reels) => {
                        println!("\r  [ {:^8} | {:^8} | {:^8} ]              ", reels[0], reels[1], reels[2]);
                    }
                    MachineEvent::Resolved { entry, message } => {
                        println!("{message}");
                        println!(
                            "balance: ${}  jackpot chance after {} plays: {:.4}%",
                            entry.balance, entry.play, entry.jackpot_probability
                        );
                        if let Some(nonce) = entry.nonce {
                            println!("nonce: {nonce}");
                        }
                        log.push(entry);
                    }
                    MachineEvent::Busted => println!("{BUSTED_MESSAGE}"),
                }
            }
        }
    }
    let session = machine.session().await;
    info!(
        plays = session.play_count(),
        balance = session.balance(),
        "leaving the machine"
    );
    Ok(())
}

fn print_status(view: &SessionView) {
    println!(
        "balance: ${}  bet: ${}  plays: {}",
        view.balance, view.bet, view.play_count
    );
    if let Some(result) = &view.last_result {
        print!("last: {result}");
        if view.win_amount > 0 {
            print!("  (+${})", view.win_amount);
        }
        println!();
    }
    println!(
        "jackpot chance after {} plays: {:.4}%",
        view.play_count, view.jackpot_probability
    );
}

pub fn print_table(params: &EngineParams) {
    println!("{:<16} {:>10} {:>12}", "symbol", "multiplier", "probability");
    for row in payout_rows(params) {
        println!(
            "{:<16} {:>9}x {:>11.1}%",
            row.symbol, row.multiplier, row.probability
        );
    }
    let edge = house_edge(&params.table);
    if edge >= 0.0 {
        println!("house edge: {:.2}% of every bet", edge * 100.0);
    } else {
        println!(
            "this table pays back {:.2}% more than it takes, on average",
            -edge * 100.0
        );
    }
}

fn print_history(view: &SessionView) {
    println!("{:>6} {:>10} {:>12}", "play", "balance", "jackpot %");
    for (play, (balance, jackpot)) in view
        .balance_history
        .iter()
        .zip(&view.jackpot_history)
        .enumerate()
    {
        println!("{play:>6} {balance:>10} {jackpot:>12.6}");
    }
}
