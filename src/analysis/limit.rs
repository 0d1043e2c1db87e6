use std::collections::BTreeSet;

use crate::types::stop_list::TermFrequency;

pub struct LimitResult {
    pub terms: Vec<String>,
    pub excluded_by_limit: usize,
}

/// Lowercases ranked terms, keeps the first of each lowercase duplicate, and
/// stops accepting once `limit` terms are kept.
pub fn apply_limit(ranked: &[TermFrequency], limit: Option<usize>) -> LimitResult {
    let mut terms = Vec::new();
    let mut seen = BTreeSet::new();
    let mut excluded_by_limit = 0;

    for tf in ranked {
        let lowered = tf.term.to_lowercase();
        if seen.contains(&lowered) {
            continue;
        }
        seen.insert(lowered.clone());

        if limit.is_some_and(|max| terms.len() >= max) {
            excluded_by_limit += 1;
        } else {
            terms.push(lowered);
        }
    }

    LimitResult {
        terms,
        excluded_by_limit,
    }
}
