//! Closed-form odds for a symbol table: jackpot chances, hit rates and the
//! expected return that backs the "house always wins" message.

use serde::{Deserialize, Serialize};

use crate::paytable::{PAIR_MULTIPLIER, REELS};
use crate::symbols::SymbolTable;

/// Which outcome counts as "the jackpot" when charting cumulative odds.
///
/// `RarestTriple` is the rarest symbol on all three reels. `AnyTriple` is
/// any three of a kind; for the classic table its per-spin chance is
/// 0.09544, the constant one revision of the widget hard-coded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JackpotModel {
    #[default]
    RarestTriple,
    AnyTriple,
}

impl JackpotModel {
    pub fn per_spin(self, table: &SymbolTable) -> f64 {
        match self {
            JackpotModel::RarestTriple => table.rarest().probability.powi(REELS as i32),
            JackpotModel::AnyTriple => triple_probability(table),
        }
    }
}

/// Chance, in percent, of at least one success in `play_count` independent
/// tries. `play_count` is floored at 1 so the chart never starts at a
/// meaningless zero.
pub fn cumulative_probability(per_spin: f64, play_count: u64) -> f64 {
    let n = play_count.max(1) as f64;
    ((1.0 - (1.0 - per_spin).powf(n)) * 100.0).clamp(0.0, 100.0)
}

/// Cumulative chance of having hit the rarest symbol on all three reels.
pub fn cumulative_jackpot_probability(table: &SymbolTable, play_count: u64) -> f64 {
    cumulative_probability(JackpotModel::RarestTriple.per_spin(table), play_count)
}

pub fn triple_probability(table: &SymbolTable) -> f64 {
    table.symbols().iter().map(|s| s.probability.powi(3)).sum()
}

/// Exactly two reels match.
pub fn pair_probability(table: &SymbolTable) -> f64 {
    table
        .symbols()
        .iter()
        .map(|s| 3.0 * s.probability.powi(2) * (1.0 - s.probability))
        .sum()
}

/// Expected payout per unit staked, before integer rounding.
pub fn expected_return(table: &SymbolTable) -> f64 {
    let triples: f64 = table
        .symbols()
        .iter()
        .map(|s| s.probability.powi(3) * s.multiplier)
        .sum();
    triples + PAIR_MULTIPLIER * pair_probability(table)
}

/// Fraction of each bet the house keeps on average. Negative when the table
/// favours the player.
pub fn house_edge(table: &SymbolTable) -> f64 {
    1.0 - expected_return(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;

    const EPS: f64 = 1e-12;

    #[test]
    fn floor_of_one_play() {
        let table = SymbolTable::classic();
        let p3 = 0.01f64.powi(3);
        let expected = (1.0 - (1.0 - p3)) * 100.0;
        let zero = cumulative_jackpot_probability(&table, 0);
        let one = cumulative_jackpot_probability(&table, 1);
        assert_eq!(zero, one);
        assert!((one - expected).abs() < EPS);
    }

    #[test]
    fn monotonic_and_bounded() {
        let table = SymbolTable::classic();
        let mut prev = cumulative_jackpot_probability(&table, 0);
        for n in 1..5_000u64 {
            let next = cumulative_jackpot_probability(&table, n);
            assert!(next >= prev, "dropped at {n}");
            assert!((0.0..=100.0).contains(&next));
            prev = next;
        }
        let far = cumulative_probability(0.5, 10_000);
        assert!((far - 100.0).abs() < EPS);
    }

    #[test]
    fn any_triple_matches_legacy_constant() {
        let table = SymbolTable::classic();
        assert!((JackpotModel::AnyTriple.per_spin(&table) - 0.09544).abs() < 1e-9);
        assert!((JackpotModel::RarestTriple.per_spin(&table) - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn classic_table_returns_more_than_staked() {
        let table = SymbolTable::classic();
        assert!((pair_probability(&table) - 0.56628).abs() < 1e-9);
        assert!((expected_return(&table) - 1.086625).abs() < 1e-9);
        assert!(house_edge(&table) < 0.0);
    }

    #[test]
    fn hit_rates_partition_outcomes() {
        let table = SymbolTable::new(vec![
            Symbol::new("A", 2.0, 0.5),
            Symbol::new("B", 2.0, 0.3),
            Symbol::new("C", 2.0, 0.2),
        ])
        .unwrap();
        // miss = all distinct = 3! * pa * pb * pc
        let miss = 6.0 * 0.5 * 0.3 * 0.2;
        let total = triple_probability(&table) + pair_probability(&table) + miss;
        assert!((total - 1.0).abs() < 1e-12);
    }
}
