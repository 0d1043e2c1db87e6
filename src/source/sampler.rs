use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{PageLookup, PageSource, SourceError};
use crate::document::{ContentVersion, Page};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Gave up on page {slot} after {attempts} failed attempts; last failure: {last_failure}")]
    AttemptsExhausted {
        slot: usize,
        attempts: usize,
        last_failure: String,
    },
}

/// Why a single sampling attempt produced no page.
#[derive(Debug)]
enum AttemptFailure {
    Source(SourceError),
    NoRandomTitle,
    NoSearchHit(String),
    Missing(String),
    UnresolvedDisambiguation(String),
    EmptyContent(String),
    Duplicate(String),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Source(e) => write!(f, "{e}"),
            AttemptFailure::NoRandomTitle => write!(f, "no random title returned"),
            AttemptFailure::NoSearchHit(q) => write!(f, "no search result for {q:?}"),
            AttemptFailure::Missing(t) => write!(f, "page {t:?} does not exist"),
            AttemptFailure::UnresolvedDisambiguation(t) => {
                write!(f, "{t:?} is a disambiguation page")
            }
            AttemptFailure::EmptyContent(t) => write!(f, "page {t:?} has no text"),
            AttemptFailure::Duplicate(t) => write!(f, "page {t:?} already sampled"),
        }
    }
}

impl From<SourceError> for AttemptFailure {
    fn from(e: SourceError) -> Self {
        AttemptFailure::Source(e)
    }
}

/// Pages collected by one sampling run.
#[derive(Debug, Clone)]
pub struct Sample {
    pub pages: Vec<Page>,
    /// Attempts made across all slots, successful ones included.
    pub attempts: usize,
    pub duplicates_skipped: usize,
}

/// Draws distinct random articles from a PageSource.
///
/// Single-threaded; one request at a time.
pub struct PageSampler<S, R = StdRng> {
    source: S,
    rng: R,
    max_attempts_per_page: usize,
}

impl<S: PageSource> PageSampler<S, StdRng> {
    /// Seeded samplers pick the same disambiguation options on every run.
    pub fn new(source: S, max_attempts_per_page: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(source, rng, max_attempts_per_page)
    }
}

impl<S, R> PageSampler<S, R>
where
    S: PageSource,
    R: Rng,
{
    pub fn with_rng(source: S, rng: R, max_attempts_per_page: usize) -> Self {
        Self {
            source,
            rng,
            max_attempts_per_page: max_attempts_per_page.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn sample(&mut self, count: usize) -> Result<Sample, SampleError> {
        let mut pages = Vec::with_capacity(count);
        let mut seen: BTreeSet<ContentVersion> = BTreeSet::new();
        let mut attempts = 0;
        let mut duplicates_skipped = 0;

        info!(pages = count, "sampling random pages");

        for slot in 0..count {
            let mut last_failure = None;

            for attempt in 1..=self.max_attempts_per_page {
                attempts += 1;
                match self.attempt(&seen) {
                    Ok(page) => {
                        debug!(
                            slot,
                            attempt,
                            title = %page.title,
                            version = page.version.as_str(),
                            bytes = page.content.len(),
                            "sampled page"
                        );
                        seen.insert(page.version.clone());
                        pages.push(page);
                        last_failure = None;
                        break;
                    }
                    Err(failure) => {
                        if matches!(failure, AttemptFailure::Duplicate(_)) {
                            duplicates_skipped += 1;
                        }
                        warn!(slot, attempt, reason = %failure, "sampling attempt failed");
                        last_failure = Some(failure);
                    }
                }
            }

            if let Some(failure) = last_failure {
                return Err(SampleError::AttemptsExhausted {
                    slot,
                    attempts: self.max_attempts_per_page,
                    last_failure: failure.to_string(),
                });
            }
        }

        info!(
            pages = pages.len(),
            attempts,
            duplicates_skipped,
            requests = self.source.request_count(),
            "sampling complete"
        );

        Ok(Sample {
            pages,
            attempts,
            duplicates_skipped,
        })
    }

    /// random title -> best search hit -> page; a disambiguation page gets
    /// one more hop through a randomly chosen option.
    fn attempt(&mut self, seen: &BTreeSet<ContentVersion>) -> Result<Page, AttemptFailure> {
        let random = self
            .source
            .random_titles(1)?
            .into_iter()
            .next()
            .ok_or(AttemptFailure::NoRandomTitle)?;

        let topic = self.top_hit(&random)?;
        let page = match self.source.page(&topic)? {
            PageLookup::Found(page) => page,
            PageLookup::Missing { title } => return Err(AttemptFailure::Missing(title)),
            PageLookup::Disambiguation { title, options } => {
                let option = options
                    .choose(&mut self.rng)
                    .cloned()
                    .ok_or_else(|| AttemptFailure::UnresolvedDisambiguation(title.clone()))?;
                debug!(from = %title, to = %option, "following disambiguation option");

                let topic = self.top_hit(&option)?;
                match self.source.page(&topic)? {
                    PageLookup::Found(page) => page,
                    PageLookup::Missing { title } => return Err(AttemptFailure::Missing(title)),
                    PageLookup::Disambiguation { title, .. } => {
                        return Err(AttemptFailure::UnresolvedDisambiguation(title))
                    }
                }
            }
        };

        if page.is_empty() {
            return Err(AttemptFailure::EmptyContent(page.title));
        }
        if seen.contains(&page.version) {
            return Err(AttemptFailure::Duplicate(page.title));
        }
        Ok(page)
    }

    fn top_hit(&mut self, query: &str) -> Result<String, AttemptFailure> {
        self.source
            .search(query, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| AttemptFailure::NoSearchHit(query.to_string()))
    }
}
