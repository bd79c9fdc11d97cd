//! Configuration management for smart-ats

use crate::error::{Result, SmartAtsError};
use crate::processing::similarity::AnalysisMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub corrector: CorrectorConfig,
    pub grammar: GrammarConfig,
    pub evaluation: EvaluationConfig,
    pub output: OutputConfig,
}

/// Defaults applied when the command line does not choose explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub method: AnalysisMethod,
    pub backend: BackendKind,
    pub locale: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectorConfig {
    /// Word-frequency file, one `word count` pair per line
    pub corpus_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    Corrector,
    Grammar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    French,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    /// Grammar-service locale matching this report language
    pub fn default_locale(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::French => "fr",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackendKind::Corrector => write!(f, "corrector"),
            BackendKind::Grammar => write!(f, "grammar"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let corpus_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smart-ats")
            .join("en-spelling.txt");

        Self {
            analysis: AnalysisConfig {
                method: AnalysisMethod::VectorCosine,
                backend: BackendKind::Corrector,
                locale: "en-US".to_string(),
                language: Language::English,
            },
            corrector: CorrectorConfig { corpus_path },
            grammar: GrammarConfig {
                enabled: true,
                base_url: "http://localhost:8081".to_string(),
                timeout_secs: 20,
            },
            evaluation: EvaluationConfig {
                enabled: true,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "gemini-pro".to_string(),
                timeout_secs: 60,
                api_key_env: "GOOGLE_API_KEY".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when none is given.
    /// A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SmartAtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SmartAtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("smart-ats")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.evaluation.timeout_secs == 0 {
            return Err(SmartAtsError::Configuration(
                "evaluation.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.grammar.timeout_secs == 0 {
            return Err(SmartAtsError::Configuration(
                "grammar.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.analysis.locale.trim().is_empty() {
            return Err(SmartAtsError::Configuration(
                "analysis.locale must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
