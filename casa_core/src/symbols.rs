use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Allowed drift of the probability sum away from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Symbol {
    pub id: String,
    pub multiplier: f64,
    pub probability: f64,
}

impl Symbol {
    pub fn new(id: impl Into<String>, multiplier: f64, probability: f64) -> Self {
        Self {
            id: id.into(),
            multiplier,
            probability,
        }
    }
}

/// Ordered list of reel symbols. Order matters: draws accumulate
/// probabilities front to back and fall back to the first entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, TableError> {
        if symbols.is_empty() {
            return Err(TableError::Empty);
        }
        let mut seen = HashSet::new();
        for s in &symbols {
            if !seen.insert(s.id.as_str()) {
                return Err(TableError::Duplicate(s.id.clone()));
            }
            if !(s.multiplier.is_finite() && s.multiplier > 0.0) {
                return Err(TableError::Multiplier {
                    id: s.id.clone(),
                    value: s.multiplier,
                });
            }
            if !(s.probability > 0.0 && s.probability <= 1.0) {
                return Err(TableError::Probability {
                    id: s.id.clone(),
                    value: s.probability,
                });
            }
        }
        let sum: f64 = symbols.iter().map(|s| s.probability).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(TableError::Sum(sum));
        }
        Ok(Self { symbols })
    }

    /// The six-symbol fruit machine table.
    pub fn classic() -> Self {
        Self {
            symbols: vec![
                Symbol::new("CEREJA", 2.0, 0.4),
                Symbol::new("LIMAO", 3.0, 0.3),
                Symbol::new("LARANJA", 5.0, 0.15),
                Symbol::new("SINO", 10.0, 0.1),
                Symbol::new("ESTRELA", 20.0, 0.04),
                Symbol::new("DIAMANTE", 50.0, 0.01),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let symbols: Vec<Symbol> = serde_json::from_str(json)?;
        Self::new(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn first(&self) -> &Symbol {
        &self.symbols[0]
    }

    /// Lowest-probability symbol; the earliest one wins a tie.
    pub fn rarest(&self) -> &Symbol {
        self.symbols
            .iter()
            .fold(self.first(), |best, s| if s.probability < best.probability { s } else { best })
    }

    /// Highest-probability symbol; the first one wins a tie.
    pub fn most_common(&self) -> &Symbol {
        self.symbols
            .iter()
            .fold(self.first(), |best, s| if s.probability > best.probability { s } else { best })
    }

    pub fn probability_sum(&self) -> f64 {
        self.symbols.iter().map(|s| s.probability).sum()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl TryFrom<Vec<Symbol>> for SymbolTable {
    type Error = TableError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl From<SymbolTable> for Vec<Symbol> {
    fn from(table: SymbolTable) -> Self {
        table.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_table_is_valid() {
        let table = SymbolTable::classic();
        assert!((table.probability_sum() - 1.0).abs() <= PROBABILITY_TOLERANCE);
        assert!(SymbolTable::new(table.symbols().to_vec()).is_ok());
        assert_eq!(table.rarest().id, "DIAMANTE");
        assert_eq!(table.most_common().id, "CEREJA");
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(SymbolTable::new(vec![]), Err(TableError::Empty)));
        assert!(matches!(
            SymbolTable::new(vec![Symbol::new("A", 2.0, 0.5), Symbol::new("A", 3.0, 0.5)]),
            Err(TableError::Duplicate(id)) if id == "A"
        ));
        assert!(matches!(
            SymbolTable::new(vec![Symbol::new("A", 0.0, 1.0)]),
            Err(TableError::Multiplier { .. })
        ));
        assert!(matches!(
            SymbolTable::new(vec![Symbol::new("A", 2.0, 0.0), Symbol::new("B", 2.0, 1.0)]),
            Err(TableError::Probability { .. })
        ));
        assert!(matches!(
            SymbolTable::new(vec![Symbol::new("A", 2.0, 0.5), Symbol::new("B", 2.0, 0.4)]),
            Err(TableError::Sum(_))
        ));
    }

    #[test]
    fn rarest_prefers_first_on_tie() {
        let table = SymbolTable::new(vec![
            Symbol::new("A", 2.0, 0.5),
            Symbol::new("B", 4.0, 0.25),
            Symbol::new("C", 8.0, 0.25),
        ])
        .unwrap();
        assert_eq!(table.rarest().id, "B");
    }

    #[test]
    fn most_common_need_not_be_first() {
        let table = SymbolTable::new(vec![
            Symbol::new("A", 8.0, 0.2),
            Symbol::new("B", 2.0, 0.4),
            Symbol::new("C", 3.0, 0.4),
        ])
        .unwrap();
        assert_eq!(table.most_common().id, "B");
    }

    #[test]
    fn json_round_trip_validates() {
        let json = r#"[{"id":"X","multiplier":4,"probability":0.75},{"id":"Y","multiplier":9,"probability":0.25}]"#;
        let table = SymbolTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Y").map(|s| s.multiplier), Some(9.0));

        let bad = r#"[{"id":"X","multiplier":4,"probability":0.5}]"#;
        assert!(matches!(SymbolTable::from_json(bad), Err(TableError::Sum(_))));
        assert!(matches!(SymbolTable::from_json("nope"), Err(TableError::Json(_))));
    }
}
