use std::collections::BTreeSet;

use tracing::debug;

use super::vocabulary::Vocabulary;
use crate::document::Page;
use crate::tokenize::Tokenizer;

/// Binary document-term matrix: `cell(row, col)` is true iff document `row`
/// contains vocabulary term `col` at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceMatrix {
    vocabulary: Vocabulary,
    rows: Vec<Vec<bool>>,
}

impl OccurrenceMatrix {
    pub fn build(term_sets: &[BTreeSet<String>]) -> Self {
        let vocabulary = Vocabulary::from_term_sets(term_sets);

        let rows = term_sets
            .iter()
            .map(|set| {
                let mut row = vec![false; vocabulary.len()];
                for term in set {
                    if let Some(col) = vocabulary.column_of(term) {
                        row[col] = true;
                    }
                }
                row
            })
            .collect();

        Self { vocabulary, rows }
    }

    pub fn from_pages<T: Tokenizer>(pages: &[Page], tokenizer: &T) -> Self {
        let term_sets: Vec<BTreeSet<String>> = pages
            .iter()
            .map(|page| {
                let set = tokenizer.term_set(&page.content);
                debug!(page = page.id.as_str(), distinct_terms = set.len(), "tokenized page");
                set
            })
            .collect();

        Self::build(&term_sets)
    }

    /// Rows must all be `vocabulary.len()` wide.
    pub(crate) fn from_parts(vocabulary: Vocabulary, rows: Vec<Vec<bool>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == vocabulary.len()));
        Self { vocabulary, rows }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of documents.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of terms.
    pub fn columns(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.columns() == 0
    }

    pub fn row(&self, row: usize) -> Option<&[bool]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(false)
    }

    /// Documents containing the term in `column`.
    pub fn column_hits(&self, column: usize) -> usize {
        self.rows
            .iter()
            .filter(|r| r.get(column).copied().unwrap_or(false))
            .count()
    }

    pub(crate) fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
