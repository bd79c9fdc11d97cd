//! CLI interface for Smart ATS

use crate::config::{BackendKind, Language, OutputFormat};
use crate::processing::similarity::AnalysisMethod;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "smart-ats")]
#[command(about = "Resume vs. job description matcher with mistake analysis")]
#[command(long_about = "Score a resume against a job description, list spelling and grammar mistakes, and request an ATS-style evaluation from an external text service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Similarity method: vector, overlap
        #[arg(short, long)]
        method: Option<String>,

        /// Mistake backend: corrector, grammar
        #[arg(short, long)]
        backend: Option<String>,

        /// Grammar service locale, e.g. en-US
        #[arg(long)]
        locale: Option<String>,

        /// Report language: en, fr
        #[arg(short, long)]
        language: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show every keyword instead of a shortened list
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip the external evaluation
        #[arg(long)]
        no_eval: bool,

        /// Evaluation timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Report which mistake backends and services are reachable
    CheckBackends,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

pub fn parse_method(method: &str) -> Result<AnalysisMethod, String> {
    match method.to_lowercase().as_str() {
        "vector" | "cosine" => Ok(AnalysisMethod::VectorCosine),
        "overlap" | "set" => Ok(AnalysisMethod::SetOverlap),
        _ => Err(format!("Invalid method: {}. Supported: vector, overlap", method)),
    }
}

pub fn parse_backend(backend: &str) -> Result<BackendKind, String> {
    match backend.to_lowercase().as_str() {
        "corrector" | "spelling" => Ok(BackendKind::Corrector),
        "grammar" | "languagetool" => Ok(BackendKind::Grammar),
        _ => Err(format!("Invalid backend: {}. Supported: corrector, grammar", backend)),
    }
}

pub fn parse_language(language: &str) -> Result<Language, String> {
    match language.to_lowercase().as_str() {
        "en" | "english" => Ok(Language::English),
        "fr" | "french" | "français" => Ok(Language::French),
        _ => Err(format!("Invalid language: {}. Supported: en, fr", language)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
