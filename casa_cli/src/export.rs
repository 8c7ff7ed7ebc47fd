use std::io;
use std::path::Path;

use anyhow::Context;
use casa_shared::{SessionView, SpinLogEntry};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ExportRow {
    play: usize,
    balance: u64,
    jackpot_probability: f64,
    ts: Option<String>,
    reels: Option<String>,
    bet: Option<u64>,
    winnings: Option<u64>,
    nonce: Option<u64>,
}

/// Write both chart series, one row per history index. Row 0 is the seeded
/// state and carries no spin details.
pub fn write_history<W: io::Write>(
    out: W,
    view: &SessionView,
    log: &[SpinLogEntry],
) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    let rows = view.balance_history.len().min(view.jackpot_history.len());
    for play in 0..rows {
        let entry = log.iter().find(|e| e.play as usize == play);
        wtr.serialize(ExportRow {
            play,
            balance: view.balance_history[play],
            jackpot_probability: view.jackpot_history[play],
            ts: entry.map(|e| e.ts.to_rfc3339()),
            reels: entry.map(|e| e.reels.join(" ")),
            bet: entry.map(|e| e.bet),
            winnings: entry.map(|e| e.winnings),
            nonce: entry.and_then(|e| e.nonce),
        })?;
    }
    wtr.flush()?;
    Ok(rows)
}

pub fn export_csv(path: &Path, view: &SessionView, log: &[SpinLogEntry]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_history(file, view, log).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn view() -> SessionView {
        SessionView {
            balance: 1005,
            bet: 10,
            spinning: false,
            reels: ["CEREJA", "CEREJA", "LIMAO"].map(String::from),
            last_result: Some("You won $15!".into()),
            win_amount: 15,
            play_count: 1,
            balance_history: vec![1000, 1005],
            jackpot_history: vec![0.0, 0.5],
            jackpot_probability: 0.5,
        }
    }

    #[test]
    fn writes_seed_row_and_spin_rows() {
        let log = vec![SpinLogEntry {
            play: 1,
            ts: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            reels: ["CEREJA", "CEREJA", "LIMAO"].map(String::from),
            bet: 10,
            winnings: 15,
            balance: 1005,
            jackpot_probability: 0.5,
            nonce: Some(7),
        }];
        let mut buf = Vec::new();
        let rows = write_history(&mut buf, &view(), &log).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "play,balance,jackpot_probability,ts,reels,bet,winnings,nonce"
        );
        assert_eq!(lines[1], "0,1000,0.0,,,,,");
        assert_eq!(
            lines[2],
            "1,1005,0.5,2024-01-02T03:04:05+00:00,CEREJA CEREJA LIMAO,10,15,7"
        );
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let rows = export_csv(&path, &view(), &[]).unwrap();
        assert_eq!(rows, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
