use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Words carry at least two ASCII letters, optionally with digits around or
/// between them. Bare numbers never match.
pub const WORD_PATTERN: &str = r"\d*[a-zA-Z]+\d*[a-zA-Z]+\d*";

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WORD_PATTERN).expect("WORD_PATTERN is a valid regex"));

pub trait Tokenizer {
    /// All tokens in order of appearance, duplicates included.
    fn tokens(&self, content: &str) -> Vec<String>;

    /// Distinct tokens of a document. This is what one-hot encoding consumes.
    fn term_set(&self, content: &str) -> BTreeSet<String> {
        self.tokens(content).into_iter().collect()
    }
}

/// Case-sensitive, leftmost-first, non-overlapping regex word extraction.
#[derive(Debug, Clone)]
pub struct WordPatternTokenizer {
    pattern: Regex,
}

impl Default for WordPatternTokenizer {
    fn default() -> Self {
        Self {
            pattern: WORD_RE.clone(),
        }
    }
}

impl WordPatternTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for WordPatternTokenizer {
    fn tokens(&self, content: &str) -> Vec<String> {
        self.pattern
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
