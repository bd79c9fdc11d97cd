//! Sentence and word segmentation

use unicode_segmentation::UnicodeSegmentation;

/// Split text into sentences, trimmed, empty ones dropped, in document order
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// A piece of a sentence: either a word to check or the text between words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Word(&'a str),
    Other(&'a str),
}

/// Split a sentence on Unicode word boundaries.
///
/// Concatenating the segments gives back the input exactly, so a corrected
/// sentence can be rebuilt around replaced words.
pub fn segments(sentence: &str) -> Vec<Segment<'_>> {
    sentence
        .split_word_bounds()
        .map(|piece| {
            if piece.chars().any(char::is_alphabetic) {
                Segment::Word(piece)
            } else {
                Segment::Other(piece)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let text = "I write Rust. I also write Python!  Do you?\n\n";
        let sentences = split_sentences(text);

        assert_eq!(sentences, vec!["I write Rust.", "I also write Python!", "Do you?"]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_segments_rebuild_input() {
        let sentence = "Led a team of 5, shipping v2.0 on time.";
        let rebuilt: String = segments(sentence)
            .iter()
            .map(|s| match s {
                Segment::Word(w) | Segment::Other(w) => *w,
            })
            .collect();

        assert_eq!(rebuilt, sentence);
    }

    #[test]
    fn test_segments_classify_words() {
        let words: Vec<&str> = segments("Hello, world 42")
            .into_iter()
            .filter_map(|s| match s {
                Segment::Word(w) => Some(w),
                Segment::Other(_) => None,
            })
            .collect();

        assert_eq!(words, vec!["Hello", "world"]);
    }
}
