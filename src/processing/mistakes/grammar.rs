//! Rule-based grammar checking through a LanguageTool-compatible HTTP service

use crate::config::GrammarConfig;
use crate::error::{Result, SmartAtsError};
use crate::processing::mistakes::{Finding, Locale, MistakeChecker};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One issue reported by the grammar service.
///
/// `offset` and `length` count UTF-16 code units of the checked text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarMatch {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    matches: Vec<GrammarMatch>,
}

/// A grammar-checking service: text and locale in, matches out.
#[async_trait]
pub trait GrammarService: Send + Sync {
    async fn check(&self, text: &str, locale: &Locale) -> Result<Vec<GrammarMatch>>;
}

/// HTTP client for a LanguageTool server (`/v2/check`)
#[derive(Clone)]
pub struct LanguageToolClient {
    client: Client,
    base_url: String,
}

impl LanguageToolClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SmartAtsError::BackendUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client and make sure the server answers before handing it out
    pub async fn connect(config: &GrammarConfig) -> Result<Self> {
        if !config.enabled {
            return Err(SmartAtsError::BackendUnavailable(
                "grammar service disabled in configuration".to_string(),
            ));
        }

        let client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        client.ping().await?;
        info!("Grammar service available at {}", client.base_url);
        Ok(client)
    }

    async fn ping(&self) -> Result<()> {
        let url = format!("{}/v2/languages", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            SmartAtsError::BackendUnavailable(format!("grammar service unreachable at {}: {}", self.base_url, e))
        })?;

        if !response.status().is_success() {
            return Err(SmartAtsError::BackendUnavailable(format!(
                "grammar service at {} answered {}",
                self.base_url,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl GrammarService for LanguageToolClient {
    async fn check(&self, text: &str, locale: &Locale) -> Result<Vec<GrammarMatch>> {
        let url = format!("{}/v2/check", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[("text", text), ("language", locale.as_str())])
            .send()
            .await
            .map_err(|e| SmartAtsError::BackendUnavailable(format!("grammar check failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmartAtsError::BackendUnavailable(format!(
                "grammar service returned {}: {}",
                status, body
            )));
        }

        let parsed: CheckResponse = response
            .json()
            .await
            .map_err(|e| SmartAtsError::BackendUnavailable(format!("unreadable grammar response: {}", e)))?;

        debug!("grammar service reported {} matches", parsed.matches.len());
        Ok(parsed.matches)
    }
}

/// Mistake checker backed by a grammar service for a fixed locale
pub struct GrammarChecker {
    service: Arc<dyn GrammarService>,
    locale: Locale,
}

impl GrammarChecker {
    pub fn new(service: Arc<dyn GrammarService>, locale: Locale) -> Self {
        Self { service, locale }
    }
}

#[async_trait]
impl MistakeChecker for GrammarChecker {
    fn name(&self) -> &'static str {
        "grammar"
    }

    async fn check(&self, text: &str) -> Result<Vec<Finding>> {
        let mut matches = self.service.check(text, &self.locale).await?;
        matches.sort_by_key(|m| m.offset);
        Ok(matches.iter().map(|m| to_finding(text, m)).collect())
    }
}

/// Turn a service match into a finding, slicing the offending text out of `text`
pub fn to_finding(text: &str, grammar_match: &GrammarMatch) -> Finding {
    Finding {
        kind: grammar_match.rule.id.clone(),
        message: grammar_match.message.clone(),
        suggestions: grammar_match
            .replacements
            .iter()
            .map(|r| r.value.clone())
            .collect(),
        context: slice_utf16(text, grammar_match.offset, grammar_match.length).to_string(),
    }
}

/// Slice by UTF-16 code units, clamped to the end of `text`
fn slice_utf16(text: &str, offset: usize, length: usize) -> &str {
    let start = byte_index(text, offset);
    let end = byte_index(text, offset.saturating_add(length)).max(start);
    &text[start..end]
}

/// Byte index of the first char starting at or after `units` UTF-16 code units
fn byte_index(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (index, c) in text.char_indices() {
        if seen >= units {
            return index;
        }
        seen += c.len_utf16();
    }
    text.len()
}
