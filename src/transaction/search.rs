//! Free-text search over transaction titles and notes.

use unicode_segmentation::UnicodeSegmentation;

/// The words of a free-text search.
///
/// A transaction matches if its title or notes contain any of the words.
/// Matching is token based and case-insensitive, so "coffee" matches
/// "Morning Coffee" but "off" does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(Vec<String>);

impl SearchQuery {
    /// Split `text` into words.
    ///
    /// Returns `None` if `text` contains no words, e.g. it is empty or only
    /// punctuation.
    pub fn parse(text: &str) -> Option<Self> {
        let words: Vec<String> = text.unicode_words().map(str::to_owned).collect();

        if words.is_empty() {
            None
        } else {
            Some(Self(words))
        }
    }

    /// The words in the search.
    pub fn words(&self) -> &[String] {
        &self.0
    }

    /// Express the search as an SQLite FTS5 query.
    ///
    /// Each word is quoted so that FTS5 operators in user input are treated
    /// as plain text.
    pub fn to_fts_query(&self) -> String {
        self.0
            .iter()
            .map(|word| format!("\"{}\"", word.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}
