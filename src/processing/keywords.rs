//! Keyword extraction: lowercase, whitespace-delimited token sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Order-irrelevant set of normalized tokens.
///
/// Every token is lowercase and contains no whitespace. Iteration is sorted so
/// reports come out the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Tokens present in both sets
    pub fn intersection(&self, other: &KeywordSet) -> KeywordSet {
        KeywordSet(self.0.intersection(&other.0).cloned().collect())
    }

    /// Tokens of `self` absent from `other`
    pub fn difference(&self, other: &KeywordSet) -> KeywordSet {
        KeywordSet(self.0.difference(&other.0).cloned().collect())
    }

    pub fn intersection_count(&self, other: &KeywordSet) -> usize {
        self.0.intersection(&other.0).count()
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        KeywordSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Lowercase the text and split it on whitespace into tokens.
///
/// Leading and trailing punctuation is trimmed so that `"Python,"` and
/// `"python"` land on the same keyword; `+` and `#` survive for names like
/// `c++` and `c#`. Repetitions are kept, in document order.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(clean_token)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Normalized keyword set of `text`; empty input gives an empty set.
pub fn extract(text: &str) -> KeywordSet {
    tokenize(text).into_iter().collect()
}

fn clean_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> KeywordSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_extract_lowercases_tokens() {
        assert_eq!(extract("Hello WORLD"), set(&["hello", "world"]));
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t ").is_empty());
        assert!(extract("-- ... !!").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let keywords = extract("Rust rust RUST systems");
        assert_eq!(keywords.len(), 2);
        assert!(keywords.contains("rust"));
        assert!(keywords.contains("systems"));
    }

    #[test]
    fn test_punctuation_trimmed_but_symbols_kept() {
        let keywords = extract("Skills: Python, C++, C# (and Go).");
        assert!(keywords.contains("python"));
        assert!(keywords.contains("c++"));
        assert!(keywords.contains("c#"));
        assert!(keywords.contains("go"));
        assert!(keywords.contains("skills"));
        assert!(keywords.iter().all(|k| !k.chars().any(char::is_whitespace)));
    }

    #[test]
    fn test_tokenize_keeps_repetitions_in_order() {
        assert_eq!(tokenize("data Data science"), vec!["data", "data", "science"]);
    }

    #[test]
    fn test_set_operations() {
        let resume = extract("python sql spark");
        let job = extract("python spark kafka");

        assert_eq!(resume.intersection(&job), set(&["python", "spark"]));
        assert_eq!(job.difference(&resume), set(&["kafka"]));
        assert_eq!(resume.intersection_count(&job), 2);
    }
}
