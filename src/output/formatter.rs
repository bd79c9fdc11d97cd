//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{Result, SmartAtsError};
use crate::output::labels::Labels;
use crate::processing::analyzer::AnalysisReport;
use crate::processing::keywords::KeywordSet;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score.round() as u8 {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_keywords(&self, keywords: &KeywordSet) -> String {
        let limit = if self.detailed { keywords.len() } else { 15 };
        let mut shown: Vec<&str> = keywords.iter().take(limit).map(String::as_str).collect();
        if keywords.len() > limit {
            shown.push("…");
        }
        shown.join(", ")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let labels = Labels::for_language(report.language);
        let mut output = String::new();

        output.push_str(&self.format_header(labels.title, 1));
        output.push_str(&format!("{}\n", labels.subtitle));
        output.push_str(&format!(
            "{}: {} | {}ms\n",
            labels.generated,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms
        ));

        // Match score
        output.push_str(&self.format_header(labels.match_score, 2));
        match &report.match_result {
            Some(result) => {
                output.push_str(&format!(
                    "{}: {:.1}% {}\n",
                    labels.match_score,
                    result.score,
                    self.format_score_badge(result.score)
                ));
                output.push_str(&format!("{}: {}\n", labels.method, result.method));

                let matched = result.matched_keywords();
                let missing = result.missing_keywords();
                output.push_str(&format!(
                    "{} ({}): {}\n",
                    labels.matched_keywords,
                    matched.len(),
                    self.colorize(&self.format_keywords(&matched), Color::Green)
                ));
                output.push_str(&format!(
                    "{} ({}): {}\n",
                    labels.missing_keywords,
                    missing.len(),
                    self.colorize(&self.format_keywords(&missing), Color::Red)
                ));
            }
            None => {
                output.push_str(&format!("{}\n", self.colorize(labels.similarity_unavailable, Color::Yellow)));
            }
        }

        // Mistakes
        output.push_str(&self.format_header(labels.mistakes_heading, 2));
        if report.findings.is_empty() {
            output.push_str(&format!("{}\n", self.colorize(labels.no_mistakes, Color::Green)));
        } else {
            for finding in &report.findings {
                output.push_str(&format!(
                    "{}: {}\n",
                    labels.error,
                    self.colorize(&finding.kind, Color::Red)
                ));
                output.push_str(&format!("{}: {}\n", labels.message, finding.message));
                output.push_str(&format!("{}: {}\n", labels.suggestions, finding.suggestions.join(", ")));
                output.push_str(&format!(
                    "{}: {}\n",
                    labels.context,
                    self.colorize(&finding.context, Color::Cyan)
                ));
                output.push_str("---\n");
            }
        }

        // Evaluation
        output.push_str(&self.format_header(labels.evaluation_heading, 2));
        match &report.evaluation {
            Some(text) => output.push_str(&format!("{}\n", text)),
            None => output.push_str(&format!("{}\n", self.colorize(labels.evaluation_unavailable, Color::Yellow))),
        }

        if !report.warnings.is_empty() {
            output.push_str(&self.format_header(labels.warnings, 3));
            for warning in &report.warnings {
                output.push_str(&format!(
                    "⚠️  {}: {}\n",
                    warning.step,
                    self.colorize(&warning.message, Color::Yellow)
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    fn keyword_list(keywords: &KeywordSet) -> String {
        if keywords.is_empty() {
            return "-".to_string();
        }
        keywords
            .iter()
            .map(|k| format!("`{}`", k))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let labels = Labels::for_language(report.language);
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", labels.title));
        output.push_str(&format!(
            "*{}: {}*\n\n",
            labels.generated,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&format!("## {}\n\n", labels.match_score));
        match &report.match_result {
            Some(result) => {
                output.push_str(&format!("**{:.1}%** ({}: {})\n\n", result.score, labels.method, result.method));
                output.push_str(&format!(
                    "- **{}:** {}\n",
                    labels.matched_keywords,
                    Self::keyword_list(&result.matched_keywords())
                ));
                output.push_str(&format!(
                    "- **{}:** {}\n\n",
                    labels.missing_keywords,
                    Self::keyword_list(&result.missing_keywords())
                ));
            }
            None => output.push_str(&format!("_{}_\n\n", labels.similarity_unavailable)),
        }

        output.push_str(&format!("## {}\n\n", labels.mistakes_heading));
        if report.findings.is_empty() {
            output.push_str(&format!("{}\n\n", labels.no_mistakes));
        } else {
            for (i, finding) in report.findings.iter().enumerate() {
                output.push_str(&format!("{}. **{}:** {}\n", i + 1, labels.error, finding.kind));
                output.push_str(&format!("   - **{}:** {}\n", labels.message, finding.message));
                if !finding.suggestions.is_empty() {
                    output.push_str(&format!(
                        "   - **{}:** {}\n",
                        labels.suggestions,
                        finding.suggestions.join(", ")
                    ));
                }
                output.push_str(&format!("   - **{}:** > {}\n", labels.context, finding.context));
            }
            output.push('\n');
        }

        output.push_str(&format!("## {}\n\n", labels.evaluation_heading));
        match &report.evaluation {
            Some(text) => output.push_str(&format!("```\n{}\n```\n\n", text.trim_end())),
            None => output.push_str(&format!("_{}_\n\n", labels.evaluation_unavailable)),
        }

        if !report.warnings.is_empty() {
            output.push_str(&format!("## {}\n\n", labels.warnings));
            for warning in &report.warnings {
                output.push_str(&format!("- **{}:** {}\n", warning.step, warning.message));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter,
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        let formatters: [&dyn OutputFormatter; 3] = [
            &self.console_formatter,
            &self.json_formatter,
            &self.markdown_formatter,
        ];

        formatters
            .into_iter()
            .find(|formatter| formatter.supports_format() == *format)
            .ok_or_else(|| SmartAtsError::OutputFormatting(format!("No formatter for {:?}", format)))?
            .format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content).map_err(|e| {
        SmartAtsError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_analysis{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_analysis{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_analysis{}.md", base_name, timestamp_suffix),
    }
}

/// Where `--save` writes and in which format.
///
/// A directory gets a generated file name in `format`; a file path picks its
/// format from the extension when it names one.
pub fn resolve_save_target(save_path: &Path, resume: &Path, format: OutputFormat) -> (PathBuf, OutputFormat) {
    if save_path.is_dir() {
        let name = suggest_filename(&format, &resume.to_string_lossy(), true);
        return (save_path.join(name), format);
    }

    let implied = save_path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| match ext.to_lowercase().as_str() {
            "txt" => Some(OutputFormat::Console),
            "json" => Some(OutputFormat::Json),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            _ => None,
        });
    (save_path.to_path_buf(), implied.unwrap_or(format))
}
