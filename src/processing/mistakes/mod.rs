//! Spelling and grammar analysis with interchangeable backends
//!
//! Two backends produce the same [`Finding`] shape:
//! - [`corrector::SpellingCorrector`], offline, driven by a word-frequency corpus
//! - [`grammar::GrammarChecker`], backed by a LanguageTool-compatible service
//!
//! Whether each backend can run is decided once, when the [`MistakeAnalyzer`]
//! is initialized. An unavailable backend degrades to zero findings plus a
//! warning; it never aborts the surrounding report.

pub mod corrector;
pub mod grammar;

use crate::config::{BackendKind, Config};
use crate::error::{Result, SmartAtsError};
use async_trait::async_trait;
use corrector::{SpellingCorpus, SpellingCorrector};
use grammar::{GrammarChecker, GrammarService, LanguageToolClient};
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Finding kind emitted by the offline corrector
pub const GRAMMAR_ISSUE: &str = "Grammar Issue";

/// One reported spelling or grammar issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Category label (rule id for the grammar service)
    pub kind: String,
    pub message: String,
    /// Replacement candidates, best first
    pub suggestions: Vec<String>,
    /// The part of the source text the finding is about
    pub context: String,
}

/// Language tag understood by the grammar service, e.g. `en-US` or `fr`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale(String);

impl Locale {
    pub fn parse(tag: &str) -> Result<Self> {
        static TAG: OnceLock<Regex> = OnceLock::new();
        let pattern = TAG.get_or_init(|| {
            Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("Invalid locale regex")
        });

        let tag = tag.trim();
        if pattern.is_match(tag) {
            Ok(Locale(tag.to_string()))
        } else {
            Err(SmartAtsError::InvalidInput(format!("Invalid locale tag: '{}'", tag)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which backend analyzes a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MistakeBackend {
    LightweightCorrector,
    GrammarService(Locale),
}

impl MistakeBackend {
    pub fn from_kind(kind: BackendKind, locale: &str) -> Result<Self> {
        match kind {
            BackendKind::Corrector => Ok(MistakeBackend::LightweightCorrector),
            BackendKind::Grammar => Ok(MistakeBackend::GrammarService(Locale::parse(locale)?)),
        }
    }
}

impl fmt::Display for MistakeBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MistakeBackend::LightweightCorrector => write!(f, "corrector"),
            MistakeBackend::GrammarService(locale) => write!(f, "grammar ({})", locale),
        }
    }
}

/// Something that finds mistakes in a text, in document order.
#[async_trait]
pub trait MistakeChecker: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, text: &str) -> Result<Vec<Finding>>;
}

/// Startup-time availability of a backend resource
#[derive(Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Capability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Capability::Available(value),
            Err(e) => Capability::Unavailable(e.to_string()),
        }
    }
}

/// Findings of one analysis plus the reason the backend could not run, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MistakeOutcome {
    pub findings: Vec<Finding>,
    pub warning: Option<String>,
}

pub struct MistakeAnalyzer {
    corpus: Capability<Arc<SpellingCorpus>>,
    grammar: Capability<Arc<dyn GrammarService>>,
}

impl MistakeAnalyzer {
    pub fn new(
        corpus: Capability<Arc<SpellingCorpus>>,
        grammar: Capability<Arc<dyn GrammarService>>,
    ) -> Self {
        Self { corpus, grammar }
    }

    /// Load the corpus and contact the grammar service, once per process.
    ///
    /// With `selected` set, only that backend is acquired; the other one is
    /// reported unavailable without being touched.
    pub async fn initialize(config: &Config, selected: Option<BackendKind>) -> Self {
        let wanted = |kind: BackendKind| selected.map_or(true, |s| s == kind);

        let corpus = if wanted(BackendKind::Corrector) {
            Capability::from_result(SpellingCorpus::load(&config.corrector.corpus_path).map(Arc::new))
        } else {
            Capability::Unavailable("not selected for this run".to_string())
        };
        if let Capability::Unavailable(reason) = &corpus {
            info!("Offline corrector unavailable: {}", reason);
        }

        let grammar = if wanted(BackendKind::Grammar) {
            Capability::from_result(
                LanguageToolClient::connect(&config.grammar)
                    .await
                    .map(|client| Arc::new(client) as Arc<dyn GrammarService>),
            )
        } else {
            Capability::Unavailable("not selected for this run".to_string())
        };
        if let Capability::Unavailable(reason) = &grammar {
            info!("Grammar service unavailable: {}", reason);
        }

        Self::new(corpus, grammar)
    }

    pub fn corrector_available(&self) -> bool {
        self.corpus.is_available()
    }

    pub fn grammar_available(&self) -> bool {
        self.grammar.is_available()
    }

    /// The checker implementing `backend`, or why it cannot run
    pub fn checker(&self, backend: &MistakeBackend) -> Result<Box<dyn MistakeChecker>> {
        match backend {
            MistakeBackend::LightweightCorrector => match &self.corpus {
                Capability::Available(corpus) => Ok(Box::new(SpellingCorrector::new(corpus.clone()))),
                Capability::Unavailable(reason) => Err(SmartAtsError::CorpusUnavailable(reason.clone())),
            },
            MistakeBackend::GrammarService(locale) => match &self.grammar {
                Capability::Available(service) => {
                    Ok(Box::new(GrammarChecker::new(service.clone(), locale.clone())))
                }
                Capability::Unavailable(reason) => Err(SmartAtsError::BackendUnavailable(reason.clone())),
            },
        }
    }

    /// Analyze `text`, turning any backend failure into a warning
    pub async fn analyze(&self, text: &str, backend: &MistakeBackend) -> MistakeOutcome {
        let result = match self.checker(backend) {
            Ok(checker) => checker.check(text).await.map(|findings| {
                info!("{} backend reported {} findings", checker.name(), findings.len());
                findings
            }),
            Err(e) => Err(e),
        };

        match result {
            Ok(findings) => MistakeOutcome {
                findings,
                warning: None,
            },
            Err(e) => {
                warn!("Skipping mistake analysis: {}", e);
                MistakeOutcome {
                    findings: Vec::new(),
                    warning: Some(e.to_string()),
                }
            }
        }
    }
}
