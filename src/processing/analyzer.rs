//! Analysis engine: validates a request and runs mistake analysis, similarity
//! scoring and the external evaluation side by side

use crate::config::{BackendKind, Config, Language};
use crate::error::{Result, SmartAtsError};
use crate::llm::evaluator::{EvaluationService, GeminiClient};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::processing::mistakes::{Capability, Finding, MistakeAnalyzer, MistakeBackend};
use crate::processing::similarity::{self, AnalysisMethod, MatchResult};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything one analysis needs
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Candidate document (resume)
    pub source_text: String,
    /// Target description (job description)
    pub target_text: String,
    pub method: AnalysisMethod,
    pub backend: MistakeBackend,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStep {
    MistakeAnalysis,
    Similarity,
    Evaluation,
}

impl fmt::Display for AnalysisStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisStep::MistakeAnalysis => write!(f, "mistake analysis"),
            AnalysisStep::Similarity => write!(f, "similarity"),
            AnalysisStep::Evaluation => write!(f, "evaluation"),
        }
    }
}

/// A step that could not complete; the rest of the report is still valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub step: AnalysisStep,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub findings: Vec<Finding>,
    /// `None` when the similarity step failed
    pub match_result: Option<MatchResult>,
    /// Raw evaluation text, `None` when the service was skipped or failed
    pub evaluation: Option<String>,
    pub warnings: Vec<AnalysisWarning>,
    pub method: AnalysisMethod,
    pub backend: MistakeBackend,
    pub language: Language,
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl AnalysisReport {
    pub fn warning_for(&self, step: AnalysisStep) -> Option<&AnalysisWarning> {
        self.warnings.iter().find(|w| w.step == step)
    }
}

/// Main analysis engine holding the capabilities acquired at startup
pub struct AnalysisEngine {
    mistakes: MistakeAnalyzer,
    evaluator: Capability<Arc<dyn EvaluationService>>,
    prompts: PromptTemplates,
    evaluation_timeout: Duration,
}

impl AnalysisEngine {
    pub fn new(
        mistakes: MistakeAnalyzer,
        evaluator: Capability<Arc<dyn EvaluationService>>,
        evaluation_timeout: Duration,
    ) -> Self {
        Self {
            mistakes,
            evaluator,
            prompts: PromptTemplates::default(),
            evaluation_timeout,
        }
    }

    /// Acquire mistake backends and the evaluation client from configuration.
    /// `backend` limits acquisition to the one mistake backend a run uses.
    pub async fn initialize(config: &Config, backend: Option<BackendKind>) -> Self {
        let mistakes = MistakeAnalyzer::initialize(config, backend).await;

        let evaluator = match GeminiClient::from_env(&config.evaluation) {
            Ok(client) => Capability::Available(Arc::new(client) as Arc<dyn EvaluationService>),
            Err(e) => {
                info!("Evaluation service unavailable: {}", e);
                Capability::Unavailable(e.to_string())
            }
        };

        Self::new(
            mistakes,
            evaluator,
            Duration::from_secs(config.evaluation.timeout_secs),
        )
    }

    /// Drop the evaluation client, e.g. when the user opts out
    pub fn without_evaluation(mut self, reason: &str) -> Self {
        self.evaluator = Capability::Unavailable(reason.to_string());
        self
    }

    pub fn with_evaluation_timeout(mut self, timeout: Duration) -> Self {
        self.evaluation_timeout = timeout;
        self
    }

    pub fn mistake_analyzer(&self) -> &MistakeAnalyzer {
        &self.mistakes
    }

    pub fn evaluation_available(&self) -> bool {
        self.evaluator.is_available()
    }

    /// Run the full analysis.
    ///
    /// Fails only when one of the texts is empty; every other failure is
    /// reported as a warning next to whatever the other steps produced.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        validate(request)?;

        let start_time = Instant::now();
        info!(
            "Analyzing {} resume characters against {} job description characters",
            request.source_text.len(),
            request.target_text.len()
        );

        let (mistakes, similarity, evaluation) = tokio::join!(
            self.mistakes.analyze(&request.source_text, &request.backend),
            async { similarity::score(&request.source_text, &request.target_text, request.method) },
            self.evaluate(request),
        );

        let mut warnings = Vec::new();

        if let Some(message) = mistakes.warning {
            warnings.push(AnalysisWarning {
                step: AnalysisStep::MistakeAnalysis,
                message,
            });
        }

        let match_result = match similarity {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Similarity scoring failed: {}", e);
                warnings.push(AnalysisWarning {
                    step: AnalysisStep::Similarity,
                    message: e.to_string(),
                });
                None
            }
        };

        let evaluation = match evaluation {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Evaluation skipped: {}", e);
                warnings.push(AnalysisWarning {
                    step: AnalysisStep::Evaluation,
                    message: e.to_string(),
                });
                None
            }
        };

        Ok(AnalysisReport {
            findings: mistakes.findings,
            match_result,
            evaluation,
            warnings,
            method: request.method,
            backend: request.backend.clone(),
            language: request.language,
            generated_at: Utc::now(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn evaluate(&self, request: &AnalysisRequest) -> Result<String> {
        let service = match &self.evaluator {
            Capability::Available(service) => service,
            Capability::Unavailable(reason) => {
                return Err(SmartAtsError::EvaluationFailed(format!("not available: {}", reason)))
            }
        };

        let prompt = self.prompts.render(
            request.language,
            &PromptParams {
                resume_content: request.source_text.clone(),
                job_content: request.target_text.clone(),
            },
        );

        info!("Requesting evaluation from {}", service.name());
        match tokio::time::timeout(self.evaluation_timeout, service.evaluate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(SmartAtsError::EvaluationTimeout(self.evaluation_timeout.as_secs())),
        }
    }
}

fn validate(request: &AnalysisRequest) -> Result<()> {
    let resume_missing = request.source_text.trim().is_empty();
    let job_missing = request.target_text.trim().is_empty();

    match (resume_missing, job_missing) {
        (true, true) => Err(SmartAtsError::MissingInput(
            "both the resume and the job description are empty".to_string(),
        )),
        (true, false) => Err(SmartAtsError::MissingInput("the resume is empty".to_string())),
        (false, true) => Err(SmartAtsError::MissingInput(
            "the job description is empty".to_string(),
        )),
        (false, false) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::mistakes::corrector::{SpellingCorpus, SpellingCorrector};
    use crate::processing::mistakes::Locale;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const RESUME: &str = "Experienced software enginer skilled in Python and data analysis.";
    const JOB: &str = "Looking for a software engineer skilled in Python and big data engineering";

    struct EchoEvaluator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EvaluationService for EchoEvaluator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn evaluate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(r#"{"JD Match": "70%", "MissingKeywords": ["big data"], "Profile Summary": "ok"}"#.to_string())
        }
    }

    struct SlowEvaluator;

    #[async_trait]
    impl EvaluationService for SlowEvaluator {
        fn name(&self) -> &str {
            "slow"
        }

        async fn evaluate(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    struct DelayedEvaluator {
        delay: Duration,
        started: Mutex<Option<Instant>>,
    }

    #[async_trait]
    impl EvaluationService for DelayedEvaluator {
        fn name(&self) -> &str {
            "delayed"
        }

        async fn evaluate(&self, _prompt: &str) -> Result<String> {
            *self.started.lock().unwrap() = Some(Instant::now());
            tokio::time::sleep(self.delay).await;
            Ok("done".to_string())
        }
    }

    struct FailingEvaluator;

    #[async_trait]
    impl EvaluationService for FailingEvaluator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn evaluate(&self, _prompt: &str) -> Result<String> {
            Err(SmartAtsError::EvaluationFailed("API error (status 403): key revoked".to_string()))
        }
    }

    fn mistakes() -> MistakeAnalyzer {
        let corpus = SpellingCorpus::from_words(
            "experienced software engineer skilled in python and data analysis".split(' '),
        );
        MistakeAnalyzer::new(
            Capability::Available(Arc::new(corpus)),
            Capability::Unavailable("grammar service not installed".to_string()),
        )
    }

    fn engine(evaluator: Arc<dyn EvaluationService>) -> AnalysisEngine {
        AnalysisEngine::new(mistakes(), Capability::Available(evaluator), Duration::from_secs(5))
    }

    fn request(method: AnalysisMethod, backend: MistakeBackend) -> AnalysisRequest {
        AnalysisRequest {
            source_text: RESUME.to_string(),
            target_text: JOB.to_string(),
            method,
            backend,
            language: Language::English,
        }
    }

    #[tokio::test]
    async fn test_full_analysis() {
        let evaluator = Arc::new(EchoEvaluator {
            prompts: Mutex::new(Vec::new()),
        });
        let engine = engine(evaluator.clone());

        let report = engine
            .analyze(&request(AnalysisMethod::SetOverlap, MistakeBackend::LightweightCorrector))
            .await
            .unwrap();

        assert!(report.warnings.is_empty());
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].context, RESUME);

        let result = report.match_result.unwrap();
        assert!(result.score > 0.0 && result.score < 100.0);

        // passed through unmodified
        assert_eq!(
            report.evaluation.as_deref(),
            Some(r#"{"JD Match": "70%", "MissingKeywords": ["big data"], "Profile Summary": "ok"}"#)
        );
        let prompts = evaluator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(RESUME));
        assert!(prompts[0].contains(JOB));
    }

    #[tokio::test]
    async fn test_missing_input_aborts() {
        let engine = engine(Arc::new(FailingEvaluator));

        let mut req = request(AnalysisMethod::VectorCosine, MistakeBackend::LightweightCorrector);
        req.target_text = "   ".to_string();
        assert!(matches!(engine.analyze(&req).await, Err(SmartAtsError::MissingInput(_))));

        let mut req = request(AnalysisMethod::VectorCosine, MistakeBackend::LightweightCorrector);
        req.source_text = String::new();
        assert!(matches!(engine.analyze(&req).await, Err(SmartAtsError::MissingInput(_))));
    }

    #[tokio::test]
    async fn test_unavailable_backend_does_not_block_other_steps() {
        let engine = engine(Arc::new(EchoEvaluator {
            prompts: Mutex::new(Vec::new()),
        }));
        let backend = MistakeBackend::GrammarService(Locale::parse("en-US").unwrap());

        let report = engine
            .analyze(&request(AnalysisMethod::VectorCosine, backend))
            .await
            .unwrap();

        assert!(report.findings.is_empty());
        assert!(report.warning_for(AnalysisStep::MistakeAnalysis).is_some());
        assert!(report.match_result.is_some());
        assert!(report.evaluation.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluation_timeout_keeps_partial_results() {
        let engine = AnalysisEngine::new(
            mistakes(),
            Capability::Available(Arc::new(SlowEvaluator)),
            Duration::from_secs(30),
        );

        let report = engine
            .analyze(&request(AnalysisMethod::VectorCosine, MistakeBackend::LightweightCorrector))
            .await
            .unwrap();

        assert!(report.evaluation.is_none());
        let warning = report.warning_for(AnalysisStep::Evaluation).unwrap();
        assert!(warning.message.contains("timed out"));
        assert!(report.match_result.is_some());
        assert_eq!(report.findings.len(), 1);
    }

    #[tokio::test]
    async fn test_evaluation_failure_is_reported_once() {
        let engine = engine(Arc::new(FailingEvaluator));

        let report = engine
            .analyze(&request(AnalysisMethod::SetOverlap, MistakeBackend::LightweightCorrector))
            .await
            .unwrap();

        assert!(report.evaluation.is_none());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("key revoked"));
        assert!(report.match_result.is_some());
    }

    #[tokio::test]
    async fn test_empty_keyword_target_only_fails_similarity() {
        let engine = engine(Arc::new(EchoEvaluator {
            prompts: Mutex::new(Vec::new()),
        }));
        let mut req = request(AnalysisMethod::SetOverlap, MistakeBackend::LightweightCorrector);
        // non-empty, but nothing survives tokenization
        req.target_text = "-- ... !!".to_string();

        let report = engine.analyze(&req).await.unwrap();

        assert!(report.match_result.is_none());
        let warning = report.warning_for(AnalysisStep::Similarity).unwrap();
        assert!(warning.message.contains("Empty input"));
        assert!(report.evaluation.is_some());
        assert_eq!(report.findings.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_evaluation() {
        let engine = engine(Arc::new(FailingEvaluator)).without_evaluation("disabled with --no-eval");
        assert!(!engine.evaluation_available());

        let report = engine
            .analyze(&request(AnalysisMethod::VectorCosine, MistakeBackend::LightweightCorrector))
            .await
            .unwrap();

        assert!(report.evaluation.is_none());
        assert!(report
            .warning_for(AnalysisStep::Evaluation)
            .unwrap()
            .message
            .contains("--no-eval"));
    }

    #[tokio::test]
    async fn test_corrector_runs_alongside_evaluation() {
        let corpus = Arc::new(SpellingCorpus::from_words(
            "the quick brown fox jumps over a lazy dog while skilled python engineers write rust"
                .split(' '),
        ));
        // unknown words with no close match force the full edit-distance-2 search
        let text = "Engineers write qzxvbnmlkjhg wpoiuytrewqa mnbvcxzlkjhgf rust.";

        let calibration = Instant::now();
        SpellingCorrector::new(corpus.clone()).findings(text);
        let correction_time = calibration.elapsed();

        let evaluator = Arc::new(DelayedEvaluator {
            delay: correction_time,
            started: Mutex::new(None),
        });
        let engine = AnalysisEngine::new(
            MistakeAnalyzer::new(
                Capability::Available(corpus),
                Capability::Unavailable("not configured".to_string()),
            ),
            Capability::Available(evaluator.clone()),
            Duration::from_secs(600),
        );
        let mut req = request(AnalysisMethod::VectorCosine, MistakeBackend::LightweightCorrector);
        req.source_text = text.to_string();

        let begin = Instant::now();
        let report = engine.analyze(&req).await.unwrap();

        let evaluation_start = evaluator
            .started
            .lock()
            .unwrap()
            .expect("evaluation never started")
            .duration_since(begin);

        assert_eq!(report.evaluation.as_deref(), Some("done"));
        assert!(report.warnings.is_empty());
        assert!(
            evaluation_start < correction_time / 2,
            "evaluation waited {:?} for a {:?} correction",
            evaluation_start,
            correction_time
        );
    }
}
