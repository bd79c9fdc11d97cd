//! Smart ATS: resume vs. job description matching with mistake analysis

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use smart_ats::cli::{self, Cli, Commands, ConfigAction};
use smart_ats::config::Config;
use smart_ats::input::InputManager;
use smart_ats::output::formatter::{resolve_save_target, save_report_to_file, ReportGenerator};
use smart_ats::output::labels::Labels;
use smart_ats::processing::analyzer::{AnalysisEngine, AnalysisRequest};
use smart_ats::processing::mistakes::MistakeBackend;
use smart_ats::{Result, SmartAtsError};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            method,
            backend,
            locale,
            language,
            output,
            detailed,
            save,
            no_eval,
            timeout,
        } => {
            info!("Starting resume analysis");

            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| SmartAtsError::InvalidInput(format!("Resume file: {}", e)))?;

            let method = match method {
                Some(m) => cli::parse_method(&m).map_err(SmartAtsError::InvalidInput)?,
                None => config.analysis.method,
            };
            let backend_kind = match backend {
                Some(b) => cli::parse_backend(&b).map_err(SmartAtsError::InvalidInput)?,
                None => config.analysis.backend,
            };
            let language_given = language.is_some();
            let language = match language {
                Some(l) => cli::parse_language(&l).map_err(SmartAtsError::InvalidInput)?,
                None => config.analysis.language,
            };
            let locale = match locale {
                Some(tag) => tag,
                None if language_given => language.default_locale().to_string(),
                None => config.analysis.locale.clone(),
            };
            let backend = MistakeBackend::from_kind(backend_kind, &locale)?;
            let output_format = match output {
                Some(o) => cli::parse_output_format(&o).map_err(SmartAtsError::InvalidInput)?,
                None => config.output.format,
            };

            let labels = Labels::for_language(language);
            println!("🚀 {}", labels.title);
            println!("📄 Resume: {}", resume.display());

            let input_manager = InputManager::new();
            let source_text = input_manager.extract_text(&resume).await?;

            let target_text = match (job, job_text) {
                (Some(path), _) => {
                    println!("💼 Job Description: {}", path.display());
                    cli::validate_file_extension(&path, &["pdf", "txt", "md", "markdown"])
                        .map_err(|e| SmartAtsError::InvalidInput(format!("Job description file: {}", e)))?;
                    input_manager.extract_text(&path).await?
                }
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(SmartAtsError::MissingInput(
                        "a job description is required (--job or --job-text)".to_string(),
                    ))
                }
            };

            println!("🔧 Method: {} | Backend: {} | Output: {:?}", method, backend, output_format);

            let mut engine = AnalysisEngine::initialize(&config, Some(backend_kind)).await;
            if no_eval {
                println!("⚠️  External evaluation disabled");
                engine = engine.without_evaluation("disabled with --no-eval");
            }
            if let Some(secs) = timeout {
                if secs == 0 {
                    return Err(SmartAtsError::InvalidInput("--timeout must be greater than zero".to_string()));
                }
                engine = engine.with_evaluation_timeout(Duration::from_secs(secs));
            }

            let request = AnalysisRequest {
                source_text,
                target_text,
                method,
                backend,
                language,
            };

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .map_err(|e| SmartAtsError::OutputFormatting(e.to_string()))?,
            );
            spinner.set_message(labels.processing);
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = engine.analyze(&request).await;
            spinner.finish_and_clear();
            let report = result?;

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true);
            println!("{}", generator.generate_report(&report, &output_format)?);

            if let Some(save_path) = save {
                let (save_path, format) = resolve_save_target(&save_path, &resume, output_format);
                let plain = ReportGenerator::with_options(false, detailed, true);
                save_report_to_file(&plain.generate_report(&report, &format)?, &save_path)?;
                println!("💾 Report saved to {}", save_path.display());
            }

            println!("✅ Analysis completed in {}ms", report.processing_time_ms);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| SmartAtsError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },

        Commands::CheckBackends => {
            println!("🔍 Checking backends...\n");
            let engine = AnalysisEngine::initialize(&config, None).await;
            let mistakes = engine.mistake_analyzer();

            println!(
                "  • Offline corrector ({}): {}",
                config.corrector.corpus_path.display(),
                status(mistakes.corrector_available())
            );
            println!(
                "  • Grammar service ({}): {}",
                config.grammar.base_url,
                status(mistakes.grammar_available())
            );
            println!(
                "  • Evaluation service ({}): {}",
                config.evaluation.model,
                status(engine.evaluation_available())
            );
        }
    }

    Ok(())
}

fn status(available: bool) -> &'static str {
    if available {
        "✅ available"
    } else {
        "❌ unavailable"
    }
}
