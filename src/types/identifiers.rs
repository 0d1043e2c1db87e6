use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Normalized article title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Build a PageId from a raw title as it appears in API responses or links.
    pub fn from_title(title: &str) -> Self {
        PageId(normalize_title(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Underscores read as spaces, whitespace runs collapse to one space, ends trimmed.
fn normalize_title(title: &str) -> String {
    title
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Content hash version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ContentVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
