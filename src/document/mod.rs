pub mod metadata;
pub mod page;

pub use crate::types::identifiers::{ContentVersion, PageId};
pub use metadata::{Metadata, MetadataValue};
pub use page::Page;
