use serde::{Deserialize, Serialize};

/// Occurrence statistics for a single vocabulary term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub term: String,
    /// Documents containing the term.
    pub hits: usize,
    /// Documents not containing the term.
    pub misses: usize,
    pub frequency: f64,
}

/// Metadata describing the outcome of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub documents: usize,
    pub vocabulary_size: usize,

    /// The cutoff actually applied: the mean for `Threshold::Mean`, `f` for `Threshold::Fixed(f)`.
    pub threshold: f64,

    pub terms_above_threshold: usize,
    pub terms_excluded_by_limit: usize,
}

/// The final result of an analysis: lowercased terms, highest frequency first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopList {
    pub terms: Vec<String>,
    pub metadata: AnalysisMetadata,
}

impl StopList {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Occurrence matrix is empty ({documents} documents, {terms} terms)")]
    EmptyMatrix { documents: usize, terms: usize },

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(f64),

    #[error("Invalid limit: 0")]
    InvalidLimit,
}
