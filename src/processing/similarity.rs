//! Similarity engine: resume vs. job description match scores (0-100)

use crate::error::{Result, SmartAtsError};
use crate::processing::keywords::{self, KeywordSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which scoring strategy the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisMethod {
    /// Cosine similarity of term-frequency vectors
    VectorCosine,
    /// Share of the target's keywords found in the source
    SetOverlap,
}

impl AnalysisMethod {
    pub fn strategy(&self) -> &'static dyn SimilarityStrategy {
        match self {
            AnalysisMethod::VectorCosine => &VectorCosine,
            AnalysisMethod::SetOverlap => &SetOverlap,
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisMethod::VectorCosine => write!(f, "vector"),
            AnalysisMethod::SetOverlap => write!(f, "overlap"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Percentage in [0, 100]
    pub score: f64,
    pub method: AnalysisMethod,
    pub source_keywords: KeywordSet,
    pub target_keywords: KeywordSet,
}

impl MatchResult {
    /// Target keywords also present in the source
    pub fn matched_keywords(&self) -> KeywordSet {
        self.target_keywords.intersection(&self.source_keywords)
    }

    /// Target keywords the source never mentions
    pub fn missing_keywords(&self) -> KeywordSet {
        self.target_keywords.difference(&self.source_keywords)
    }
}

/// One way of turning two texts into a percentage.
pub trait SimilarityStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, source: &str, target: &str) -> Result<f64>;
}

/// Term-frequency cosine similarity.
///
/// The vector space has one dimension per distinct token of either text, so a
/// token present on one side only still lengthens that side's vector.
pub struct VectorCosine;

impl SimilarityStrategy for VectorCosine {
    fn name(&self) -> &'static str {
        "vector-cosine"
    }

    fn score(&self, source: &str, target: &str) -> Result<f64> {
        let source_tf = term_frequencies(source);
        let target_tf = term_frequencies(target);

        if source_tf.is_empty() {
            return Err(SmartAtsError::EmptyInput(
                "source text has no tokens to vectorize".to_string(),
            ));
        }
        if target_tf.is_empty() {
            return Err(SmartAtsError::EmptyInput(
                "target text has no tokens to vectorize".to_string(),
            ));
        }

        // Only shared dimensions contribute to the dot product
        let dot: f64 = source_tf
            .iter()
            .filter_map(|(token, &count)| target_tf.get(token).map(|&other| count * other))
            .sum();
        let source_norm_sq: f64 = source_tf.values().map(|c| c * c).sum();
        let target_norm_sq: f64 = target_tf.values().map(|c| c * c).sum();

        // sqrt of the product keeps identical texts at exactly 1.0
        let cosine = dot / (source_norm_sq * target_norm_sq).sqrt();

        debug!(
            "cosine similarity: dims={} dot={} score={:.4}",
            vocabulary_size(&source_tf, &target_tf),
            dot,
            cosine
        );

        Ok(to_percentage(cosine))
    }
}

/// `|K(source) ∩ K(target)| / |K(target)|`.
///
/// The job description is the reference: it is the denominator, never the union.
pub struct SetOverlap;

impl SimilarityStrategy for SetOverlap {
    fn name(&self) -> &'static str {
        "set-overlap"
    }

    fn score(&self, source: &str, target: &str) -> Result<f64> {
        let source_keywords = keywords::extract(source);
        let target_keywords = keywords::extract(target);

        if target_keywords.is_empty() {
            return Err(SmartAtsError::EmptyInput(
                "target text has no keywords to match against".to_string(),
            ));
        }

        let common = source_keywords.intersection_count(&target_keywords);
        Ok(to_percentage(common as f64 / target_keywords.len() as f64))
    }
}

/// Score `source` against `target` with the chosen method
pub fn score(source: &str, target: &str, method: AnalysisMethod) -> Result<MatchResult> {
    let strategy = method.strategy();
    let score = strategy.score(source, target)?;

    debug!("{} score: {:.2}%", strategy.name(), score);

    Ok(MatchResult {
        score,
        method,
        source_keywords: keywords::extract(source),
        target_keywords: keywords::extract(target),
    })
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut frequencies = HashMap::new();
    for token in keywords::tokenize(text) {
        *frequencies.entry(token).or_insert(0.0) += 1.0;
    }
    frequencies
}

fn vocabulary_size(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> usize {
    a.len() + b.keys().filter(|token| !a.contains_key(*token)).count()
}

fn to_percentage(ratio: f64) -> f64 {
    (ratio * 100.0).clamp(0.0, 100.0)
}
