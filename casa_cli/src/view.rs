use casa_core::{pair_probability, EngineParams, SessionState, PAIR_MULTIPLIER};
use casa_shared::{PayoutRow, SessionView};

use crate::machine::reel_ids;

pub fn session_view(session: &SessionState, params: &EngineParams, spinning: bool) -> SessionView {
    let reels = match session.last_reels() {
        Some(reels) => reel_ids(reels),
        None => {
            let first = params.table.first().id.clone();
            [first.clone(), first.clone(), first]
        }
    };
    SessionView {
        balance: session.balance(),
        bet: session.bet(),
        spinning,
        reels,
        last_result: session.result_message(),
        win_amount: session.win_amount(),
        play_count: session.play_count(),
        balance_history: session.balance_history().to_vec(),
        jackpot_history: session.jackpot_history().to_vec(),
        jackpot_probability: params.jackpot_probability(session.play_count()),
    }
}

/// Per-symbol rows followed by the two summary rows: three of the most
/// common symbol, and any two of a kind.
pub fn payout_rows(params: &EngineParams) -> Vec<PayoutRow> {
    let table = &params.table;
    let mut rows: Vec<PayoutRow> = table
        .symbols()
        .iter()
        .map(|s| PayoutRow {
            symbol: s.id.clone(),
            multiplier: s.multiplier,
            probability: s.probability * 100.0,
        })
        .collect();
    let common = table.most_common();
    rows.push(PayoutRow {
        symbol: format!("3 x {}", common.id),
        multiplier: common.multiplier,
        probability: common.probability.powi(3) * 100.0,
    });
    rows.push(PayoutRow {
        symbol: "TWO OF A KIND".to_string(),
        multiplier: PAIR_MULTIPLIER,
        probability: pair_probability(table) * 100.0,
    });
    rows
}
