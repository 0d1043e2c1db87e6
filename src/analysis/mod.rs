pub mod frequency;
pub mod limit;
pub mod output;
pub mod threshold;

use std::cmp::Ordering;

use tracing::info;

use crate::matrix::OccurrenceMatrix;
use crate::types::stop_list::{AnalysisError, AnalysisMetadata, StopList, TermFrequency};
pub use frequency::{term_frequencies, FrequencyFormula};
pub use limit::{apply_limit, LimitResult};
pub use output::write_stop_list;
pub use threshold::{Cutoff, Threshold};

#[derive(Debug, Clone, PartialEq)]
pub struct StopListAnalyzer {
    formula: FrequencyFormula,
    threshold: Threshold,
    limit: Option<usize>,
}

impl Default for StopListAnalyzer {
    fn default() -> Self {
        Self {
            formula: FrequencyFormula::OverTotal,
            threshold: Threshold::Mean,
            limit: None,
        }
    }
}

impl StopListAnalyzer {
    pub fn new(
        formula: FrequencyFormula,
        threshold: Threshold,
        limit: Option<usize>,
    ) -> Result<Self, AnalysisError> {
        threshold.validate(formula)?;
        if limit == Some(0) {
            return Err(AnalysisError::InvalidLimit);
        }
        Ok(Self {
            formula,
            threshold,
            limit,
        })
    }

    pub fn analyze(&self, matrix: &OccurrenceMatrix) -> Result<StopList, AnalysisError> {
        if matrix.is_empty() {
            return Err(AnalysisError::EmptyMatrix {
                documents: matrix.rows(),
                terms: matrix.columns(),
            });
        }

        // 1. Frequency Phase
        let frequencies = term_frequencies(matrix, self.formula);
        let cutoff = self.threshold.cutoff(self.formula, &frequencies);

        // 2. Threshold Phase (strictly above)
        let mut qualifying: Vec<TermFrequency> = frequencies
            .into_iter()
            .filter(|tf| cutoff.admits(tf))
            .collect();

        // 3. Ordering Phase: frequency desc, term asc
        qualifying.sort_by(|a, b| {
            let freq_cmp = b
                .frequency
                .partial_cmp(&a.frequency)
                .unwrap_or(Ordering::Equal);
            if freq_cmp != Ordering::Equal {
                freq_cmp
            } else {
                a.term.cmp(&b.term)
            }
        });

        debug_assert!(qualifying.windows(2).all(|w| {
            w[0].frequency > w[1].frequency
                || (w[0].frequency == w[1].frequency && w[0].term <= w[1].term)
        }));

        // 4. Limit Phase
        let LimitResult {
            terms,
            excluded_by_limit,
        } = apply_limit(&qualifying, self.limit);

        let metadata = AnalysisMetadata {
            documents: matrix.rows(),
            vocabulary_size: matrix.columns(),
            threshold: cutoff.value(),
            terms_above_threshold: qualifying.len(),
            terms_excluded_by_limit: excluded_by_limit,
        };

        info!(
            documents = metadata.documents,
            vocabulary = metadata.vocabulary_size,
            threshold = metadata.threshold,
            above_threshold = metadata.terms_above_threshold,
            kept = terms.len(),
            "analyzed occurrence matrix"
        );

        Ok(StopList { terms, metadata })
    }
}
