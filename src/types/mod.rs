pub mod identifiers;
pub mod stop_list;

pub use identifiers::{ContentVersion, PageId};
pub use stop_list::{AnalysisError, AnalysisMetadata, StopList, TermFrequency};
