//! Score-banded tier weights.

use serde::{Deserialize, Serialize};

use crate::cards::Rarity;

/// One band of the table: weights apply once the score reaches `min_impressions`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilityRow {
    pub min_impressions: i64,
    pub common_weight: u32,
    pub rare_weight: u32,
    pub epic_weight: u32,
}

impl ProbabilityRow {
    #[must_use]
    pub const fn new(min_impressions: i64, common: u32, rare: u32, epic: u32) -> Self {
        Self {
            min_impressions,
            common_weight: common,
            rare_weight: rare,
            epic_weight: epic,
        }
    }

    /// Weights indexed like [`Rarity::ALL`].
    #[must_use]
    pub const fn weights(&self) -> [u32; 3] {
        [self.common_weight, self.rare_weight, self.epic_weight]
    }

    /// Weight of a single tier.
    #[must_use]
    pub const fn weight(&self, rarity: Rarity) -> u32 {
        self.weights()[rarity.index()]
    }
}

/// All-Common row used when a table is empty.
pub const COMMON_ONLY: ProbabilityRow = ProbabilityRow::new(0, 100, 0, 0);

/// Ascending list of rows; lookup picks the last row whose
/// `min_impressions <= score`.
///
/// ```
/// use influence_deck::draft::{DraftProbabilityTable, ProbabilityRow};
///
/// let table = DraftProbabilityTable::new(vec![
///     ProbabilityRow::new(0, 100, 0, 0),
///     ProbabilityRow::new(1000, 50, 30, 20),
/// ]);
/// assert_eq!(table.lookup(500).min_impressions, 0);
/// assert_eq!(table.lookup(1500).min_impressions, 1000);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftProbabilityTable {
    rows: Vec<ProbabilityRow>,
}

impl DraftProbabilityTable {
    #[must_use]
    pub fn new(rows: Vec<ProbabilityRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[ProbabilityRow] {
        &self.rows
    }

    /// Whether rows ascend strictly by `min_impressions`.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.rows.windows(2).all(|w| w[0].min_impressions < w[1].min_impressions)
    }

    /// Row for a score. Scores below the first band use the first row; an
    /// empty table is all Common.
    #[must_use]
    pub fn lookup(&self, score: i64) -> ProbabilityRow {
        self.rows
            .iter()
            .rev()
            .find(|row| row.min_impressions <= score)
            .or_else(|| self.rows.first())
            .copied()
            .unwrap_or(COMMON_ONLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_band() -> DraftProbabilityTable {
        DraftProbabilityTable::new(vec![
            ProbabilityRow::new(0, 100, 0, 0),
            ProbabilityRow::new(1000, 50, 30, 20),
        ])
    }

    #[test]
    fn test_lookup_bands() {
        let table = two_band();
        assert_eq!(table.lookup(500), ProbabilityRow::new(0, 100, 0, 0));
        assert_eq!(table.lookup(1000), ProbabilityRow::new(1000, 50, 30, 20));
        assert_eq!(table.lookup(1500), ProbabilityRow::new(1000, 50, 30, 20));
    }

    #[test]
    fn test_lookup_below_first_band() {
        let table = DraftProbabilityTable::new(vec![ProbabilityRow::new(100, 10, 10, 10)]);
        assert_eq!(table.lookup(5).min_impressions, 100);
    }

    #[test]
    fn test_empty_table_is_common_only() {
        let table = DraftProbabilityTable::default();
        assert_eq!(table.lookup(1_000_000), COMMON_ONLY);
        assert_eq!(COMMON_ONLY.weight(Rarity::Common), 100);
        assert_eq!(COMMON_ONLY.weight(Rarity::Epic), 0);
    }

    #[test]
    fn test_ascending_check() {
        assert!(two_band().is_ascending());
        let bad = DraftProbabilityTable::new(vec![
            ProbabilityRow::new(1000, 1, 1, 1),
            ProbabilityRow::new(0, 1, 1, 1),
        ]);
        assert!(!bad.is_ascending());
    }

    #[test]
    fn test_json_shape() {
        let table: DraftProbabilityTable = serde_json::from_str(
            r#"[{"min_impressions":0,"common_weight":100,"rare_weight":0,"epic_weight":0}]"#,
        )
        .unwrap();
        assert_eq!(table.rows().len(), 1);
    }
}
