//! Offline, corpus-based spelling corrector

use crate::error::{Result, SmartAtsError};
use crate::processing::mistakes::{Finding, MistakeChecker, GRAMMAR_ISSUE};
use crate::processing::text_processor::{self, Segment};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use strsim::jaro_winkler;

/// Word frequencies the corrector ranks candidates by.
///
/// File format: one `word count` pair per line (count optional, defaults to 1);
/// blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone)]
pub struct SpellingCorpus {
    frequencies: HashMap<String, u64>,
    alphabet: Vec<char>,
}

impl SpellingCorpus {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SmartAtsError::CorpusUnavailable(format!(
                "corpus file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SmartAtsError::CorpusUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;

        let corpus = Self::parse(&content)?;
        info!("Loaded spelling corpus with {} words from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut frequencies = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let word = match fields.next() {
                Some(word) => word.to_lowercase(),
                None => continue,
            };
            let count = match fields.next() {
                Some(raw) => raw.parse::<u64>().map_err(|_| {
                    SmartAtsError::CorpusUnavailable(format!(
                        "invalid count '{}' on line {}",
                        raw,
                        line_no + 1
                    ))
                })?,
                None => 1,
            };

            *frequencies.entry(word).or_insert(0) += count;
        }

        if frequencies.is_empty() {
            return Err(SmartAtsError::CorpusUnavailable(
                "corpus contains no words".to_string(),
            ));
        }

        Ok(Self::from_frequencies(frequencies))
    }

    pub fn from_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut frequencies = HashMap::new();
        for word in words {
            *frequencies.entry(word.to_lowercase()).or_insert(0) += 1;
        }
        Self::from_frequencies(frequencies)
    }

    fn from_frequencies(frequencies: HashMap<String, u64>) -> Self {
        let alphabet: BTreeSet<char> = frequencies.keys().flat_map(|w| w.chars()).collect();
        Self {
            frequencies,
            alphabet: alphabet.into_iter().collect(),
        }
    }

    pub fn frequency(&self, word: &str) -> u64 {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Sentence-level corrector: one finding per sentence the corpus would rewrite
#[derive(Clone)]
pub struct SpellingCorrector {
    corpus: Arc<SpellingCorpus>,
}

impl SpellingCorrector {
    pub fn new(corpus: Arc<SpellingCorpus>) -> Self {
        Self { corpus }
    }

    /// Best replacement for `word`, or `None` when it should stay as written
    pub fn correct_word(&self, word: &str) -> Option<String> {
        if !should_check(word) {
            return None;
        }

        let lower = word.to_lowercase();
        if self.corpus.contains(&lower) {
            return None;
        }

        let first = self.edits1(&lower);
        let second;
        let mut candidates: Vec<&String> = first.iter().filter(|c| self.corpus.contains(c)).collect();

        if candidates.is_empty() {
            second = self.known_edits2(&first);
            candidates = second.iter().collect();
        }

        let best = candidates.into_iter().max_by(|a, b| {
            self.corpus
                .frequency(a)
                .cmp(&self.corpus.frequency(b))
                .then_with(|| {
                    jaro_winkler(&lower, a)
                        .partial_cmp(&jaro_winkler(&lower, b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                // Lexicographically smaller wins the final tie
                .then_with(|| b.cmp(a))
        })?;

        Some(match_case(word, best))
    }

    /// The sentence with every unknown word replaced by its best candidate
    pub fn correct_sentence(&self, sentence: &str) -> String {
        text_processor::segments(sentence)
            .into_iter()
            .map(|segment| match segment {
                Segment::Word(word) => self.correct_word(word).unwrap_or_else(|| word.to_string()),
                Segment::Other(other) => other.to_string(),
            })
            .collect()
    }

    /// Findings for `text`, one per changed sentence, in document order
    pub fn findings(&self, text: &str) -> Vec<Finding> {
        text_processor::split_sentences(text)
            .into_iter()
            .filter_map(|sentence| {
                let corrected = self.correct_sentence(sentence);
                if corrected == sentence {
                    return None;
                }
                debug!("corrected sentence: '{}' -> '{}'", sentence, corrected);
                Some(Finding {
                    kind: GRAMMAR_ISSUE.to_string(),
                    message: corrected,
                    suggestions: Vec::new(),
                    context: sentence.to_string(),
                })
            })
            .collect()
    }

    fn edits1(&self, word: &str) -> HashSet<String> {
        let chars: Vec<char> = word.chars().collect();
        let alphabet = &self.corpus.alphabet;
        let mut edits = HashSet::new();

        for i in 0..=chars.len() {
            let (left, right) = chars.split_at(i);

            // deletion
            if !right.is_empty() {
                edits.insert(left.iter().chain(&right[1..]).collect());
            }
            // transposition
            if right.len() > 1 {
                let mut swapped: Vec<char> = left.to_vec();
                swapped.push(right[1]);
                swapped.push(right[0]);
                swapped.extend_from_slice(&right[2..]);
                edits.insert(swapped.into_iter().collect());
            }
            for &c in alphabet {
                // replacement
                if !right.is_empty() {
                    edits.insert(left.iter().chain(std::iter::once(&c)).chain(&right[1..]).collect());
                }
                // insertion
                edits.insert(left.iter().chain(std::iter::once(&c)).chain(right).collect());
            }
        }

        edits.remove(word);
        edits
    }

    fn known_edits2(&self, first: &HashSet<String>) -> HashSet<String> {
        first
            .iter()
            .flat_map(|edit| self.edits1(edit))
            .filter(|candidate| self.corpus.contains(candidate))
            .collect()
    }
}

#[async_trait]
impl MistakeChecker for SpellingCorrector {
    fn name(&self) -> &'static str {
        "corrector"
    }

    /// Candidate search is CPU-bound, so it runs on the blocking pool
    async fn check(&self, text: &str) -> Result<Vec<Finding>> {
        let corrector = self.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || corrector.findings(&text))
            .await
            .map_err(|e| SmartAtsError::BackendUnavailable(format!("corrector task failed: {}", e)))
    }
}

/// Single letters, acronyms and anything with digits are left alone
fn should_check(word: &str) -> bool {
    let letters = word.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 2 || word.chars().any(|c| c.is_numeric()) {
        return false;
    }
    !word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
}

/// Carry the capitalization of `original` over to `replacement`
fn match_case(original: &str, replacement: &str) -> String {
    let mut original_chars = original.chars();
    match original_chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = replacement.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => replacement.to_string(),
    }
}
