//! Text extraction from various file formats

use crate::error::{Result, SmartAtsError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::panic;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl PdfExtractor {
    /// Text of every page, in page order; pages without text contribute nothing
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        guard_panics(|| {
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| SmartAtsError::Extraction(format!("Failed to extract text from PDF: {}", e)))
        })
    }
}

/// pdf-extract panics on some malformed fonts; surface that as an extraction error
fn guard_panics<F>(extract: F) -> Result<String>
where
    F: FnOnce() -> Result<String> + panic::UnwindSafe,
{
    panic::catch_unwind(extract).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(SmartAtsError::Extraction(format!("PDF parser crashed: {}", reason)))
    })
}

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        self.extract_bytes(&bytes).map_err(|e| {
            SmartAtsError::Extraction(format!("'{}': {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        String::from_utf8(bytes).map_err(|_| {
            SmartAtsError::Extraction(format!("'{}' is not valid UTF-8 text", path.display()))
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = PlainTextExtractor.extract(path).await?;
        Ok(self.markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> String {
        let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid tag regex");

        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");
        let text = tag_regex.replace_all(&text, "");

        // Entities last, so an escaped "&lt;b&gt;" is not mistaken for a tag
        let text = text
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
