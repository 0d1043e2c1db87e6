pub mod client;
pub mod sampler;

use thiserror::Error;

use crate::document::Page;
pub use client::{ClientConfig, MediaWikiClient};
pub use sampler::{PageSampler, Sample, SampleError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request failed with HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("API error [{code}]: {info}")]
    Api { code: String, info: String },
    #[error("Unexpected API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of resolving a title to an article.
#[derive(Debug, Clone, PartialEq)]
pub enum PageLookup {
    Found(Page),
    /// The title names a disambiguation page; `options` are the article
    /// titles it links to.
    Disambiguation { title: String, options: Vec<String> },
    Missing { title: String },
}

/// Read access to an encyclopedia.
pub trait PageSource {
    /// Titles of `count` random main-namespace articles.
    fn random_titles(&mut self, count: usize) -> Result<Vec<String>, SourceError>;

    /// Full-text search, best match first, at most `limit` titles.
    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<String>, SourceError>;

    /// Resolve a title (following redirects) to its plain-text article.
    fn page(&mut self, title: &str) -> Result<PageLookup, SourceError>;

    /// Requests issued so far.
    fn request_count(&self) -> usize {
        0
    }
}
