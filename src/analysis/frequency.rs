use serde::{Deserialize, Serialize};

use crate::matrix::OccurrenceMatrix;
use crate::types::stop_list::TermFrequency;

/// How a column's hit count becomes a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyFormula {
    /// hits / documents: the column mean, always in [0, 1].
    #[default]
    OverTotal,
    /// hits / max(misses, 1): unbounded above.
    OverMisses,
}

impl FrequencyFormula {
    pub fn apply(self, hits: usize, documents: usize) -> f64 {
        let misses = documents.saturating_sub(hits);
        match self {
            FrequencyFormula::OverTotal => {
                if documents == 0 {
                    0.0
                } else {
                    hits as f64 / documents as f64
                }
            }
            FrequencyFormula::OverMisses => hits as f64 / misses.max(1) as f64,
        }
    }

    /// Largest value `apply` can return, if bounded.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            FrequencyFormula::OverTotal => Some(1.0),
            FrequencyFormula::OverMisses => None,
        }
    }
}

/// One entry per matrix column, in column order.
pub fn term_frequencies(matrix: &OccurrenceMatrix, formula: FrequencyFormula) -> Vec<TermFrequency> {
    let documents = matrix.rows();
    matrix
        .vocabulary()
        .terms()
        .iter()
        .enumerate()
        .map(|(col, term)| {
            let hits = matrix.column_hits(col);
            TermFrequency {
                term: term.clone(),
                hits,
                misses: documents - hits,
                frequency: formula.apply(hits, documents),
            }
        })
        .collect()
}
