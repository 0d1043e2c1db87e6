use serde::{Deserialize, Serialize};

use super::frequency::FrequencyFormula;
use crate::types::stop_list::{AnalysisError, TermFrequency};

/// Cutoff a term's frequency must strictly exceed to enter the stop list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Mean frequency over all columns.
    #[default]
    Mean,
    Fixed(f64),
}

impl Threshold {
    pub fn validate(&self, formula: FrequencyFormula) -> Result<(), AnalysisError> {
        let Threshold::Fixed(value) = *self else {
            return Ok(());
        };
        if !value.is_finite() || value < 0.0 {
            return Err(AnalysisError::InvalidThreshold(value));
        }
        if let Some(upper) = formula.upper_bound() {
            if value > upper {
                return Err(AnalysisError::InvalidThreshold(value));
            }
        }
        Ok(())
    }

    pub fn cutoff(&self, formula: FrequencyFormula, frequencies: &[TermFrequency]) -> Cutoff {
        match *self {
            Threshold::Fixed(value) => Cutoff {
                value,
                rule: CutoffRule::Above,
            },
            Threshold::Mean if frequencies.is_empty() => Cutoff {
                value: 0.0,
                rule: CutoffRule::Above,
            },
            Threshold::Mean => {
                let columns = frequencies.len() as f64;
                let sum: f64 = frequencies.iter().map(|f| f.frequency).sum();
                let value = sum / columns;
                let rule = match formula {
                    // hits/D > sum(hits)/(D*C)  <=>  hits*C > sum(hits)
                    FrequencyFormula::OverTotal => CutoffRule::MeanHits {
                        total_hits: frequencies.iter().map(|f| f.hits as u128).sum(),
                        columns: frequencies.len() as u128,
                    },
                    // Summing C terms drifts by at most about C ulps of the mean.
                    FrequencyFormula::OverMisses => CutoffRule::AboveWithin {
                        tolerance: value.abs() * f64::EPSILON * 4.0 * columns,
                    },
                };
                Cutoff { value, rule }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CutoffRule {
    Above,
    AboveWithin { tolerance: f64 },
    MeanHits { total_hits: u128, columns: u128 },
}

/// A resolved threshold: the reported value plus the comparison that decides it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoff {
    value: f64,
    rule: CutoffRule,
}

impl Cutoff {
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Strictly above the cutoff.
    pub fn admits(&self, tf: &TermFrequency) -> bool {
        match self.rule {
            CutoffRule::Above => tf.frequency > self.value,
            CutoffRule::AboveWithin { tolerance } => tf.frequency - self.value > tolerance,
            CutoffRule::MeanHits {
                total_hits,
                columns,
            } => tf.hits as u128 * columns > total_hits,
        }
    }
}
