#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};

use stoplist_builder::document::{Metadata, Page};
use stoplist_builder::source::{PageLookup, PageSource, SourceError};

pub fn article(title: &str, content: &str) -> PageLookup {
    PageLookup::Found(Page::ingest(title, "fixture", content, Metadata::new()))
}

pub fn disambiguation(title: &str, options: &[&str]) -> PageLookup {
    PageLookup::Disambiguation {
        title: title.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
    }
}

/// In-memory encyclopedia. Random titles are served in order; searches
/// return the query itself unless overridden; unknown titles are missing.
#[derive(Default)]
pub struct ScriptedSource {
    random: VecDeque<String>,
    search: BTreeMap<String, Vec<String>>,
    pages: BTreeMap<String, PageLookup>,
    pub failures_remaining: usize,
    pub requests: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn random(mut self, titles: &[&str]) -> Self {
        self.random.extend(titles.iter().map(|s| s.to_string()));
        self
    }

    pub fn search_result(mut self, query: &str, hits: &[&str]) -> Self {
        self.search
            .insert(query.to_string(), hits.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn page(mut self, title: &str, lookup: PageLookup) -> Self {
        self.pages.insert(title.to_string(), lookup);
        self
    }

    pub fn article(self, title: &str, content: &str) -> Self {
        self.page(title, article(title, content))
    }

    pub fn failing_first(mut self, n: usize) -> Self {
        self.failures_remaining = n;
        self
    }
}

impl PageSource for ScriptedSource {
    fn random_titles(&mut self, count: usize) -> Result<Vec<String>, SourceError> {
        self.requests += 1;
        if self.failures_remaining > 0 {
            self.failures_remaining -= 1;
            return Err(SourceError::Api {
                code: "ratelimited".into(),
                info: "slow down".into(),
            });
        }
        let mut out = Vec::new();
        while out.len() < count {
            match self.random.pop_front() {
                Some(title) => out.push(title),
                None => break,
            }
        }
        Ok(out)
    }

    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        self.requests += 1;
        let hits = self
            .search
            .get(query)
            .cloned()
            .unwrap_or_else(|| vec![query.to_string()]);
        Ok(hits.into_iter().take(limit).collect())
    }

    fn page(&mut self, title: &str) -> Result<PageLookup, SourceError> {
        self.requests += 1;
        Ok(self
            .pages
            .get(title)
            .cloned()
            .unwrap_or_else(|| PageLookup::Missing {
                title: title.to_string(),
            }))
    }

    fn request_count(&self) -> usize {
        self.requests
    }
}
