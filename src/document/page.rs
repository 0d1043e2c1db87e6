use serde::{Deserialize, Serialize};

use super::metadata::Metadata;
use crate::types::identifiers::{ContentVersion, PageId};

/// A fetched article reduced to plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// Title as reported by the source, before normalization.
    pub title: String,
    pub version: ContentVersion,
    /// Where the page came from (API endpoint or fixture name).
    pub source: String,
    pub content: String,
    pub metadata: Metadata,
}

impl Page {
    /// Build a Page from fetched text.
    ///
    /// This is the only way to construct a Page: the id is always derived
    /// from the title and the version from the content.
    pub fn ingest(
        title: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let title = title.into();
        let content = content.into();

        Page {
            id: PageId::from_title(&title),
            version: ContentVersion::from_content(content.as_bytes()),
            title,
            source: source.into(),
            content,
            metadata,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
