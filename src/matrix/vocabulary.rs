use std::collections::{BTreeMap, BTreeSet};

/// Column labels of the occurrence matrix, in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl Vocabulary {
    /// Union of every document's term set.
    pub fn from_term_sets<'a, I>(term_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let mut all = BTreeSet::new();
        for set in term_sets {
            all.extend(set.iter().cloned());
        }
        Self::from_ordered(all.into_iter().collect())
    }

    /// Keeps the given column order. Callers guarantee the terms are distinct.
    pub(crate) fn from_ordered(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
