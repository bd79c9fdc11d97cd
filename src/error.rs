//! Error handling for the smart-ats application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartAtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Spelling corpus unavailable: {0}")]
    CorpusUnavailable(String),

    #[error("Mistake backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Evaluation timed out after {0}s")]
    EvaluationTimeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SmartAtsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SmartAtsError::EvaluationTimeout(30).to_string(),
            "Evaluation timed out after 30s"
        );
        assert_eq!(
            SmartAtsError::BackendUnavailable("no server".into()).to_string(),
            "Mistake backend unavailable: no server"
        );
        let io: SmartAtsError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, SmartAtsError::Io(_)));
    }
}
