pub mod occurrence;
pub mod staging;
pub mod vocabulary;

pub use occurrence::OccurrenceMatrix;
pub use staging::MatrixError;
pub use vocabulary::Vocabulary;
