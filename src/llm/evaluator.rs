//! External evaluation service: one prompt in, free-form text out

use crate::config::EvaluationConfig;
use crate::error::{Result, SmartAtsError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A generative-text service. The response is passed through as-is and never parsed.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    fn name(&self) -> &str;

    async fn evaluate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the Generative Language API (`models/{model}:generateContent`)
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// The whole call is bounded by the analysis engine; only connecting is limited here
    pub fn new(config: &EvaluationConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SmartAtsError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Client configured from the environment; `.env` files are honoured
    pub fn from_env(config: &EvaluationConfig) -> Result<Self> {
        if !config.enabled {
            return Err(SmartAtsError::Configuration(
                "evaluation service disabled in configuration".to_string(),
            ));
        }

        let _ = dotenvy::dotenv();
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SmartAtsError::Configuration(format!("{} is not set", config.api_key_env))
            })?;

        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl EvaluationService for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn evaluate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SmartAtsError::EvaluationFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SmartAtsError::EvaluationFailed(format!(
                "API error (status {}): {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SmartAtsError::EvaluationFailed(format!("unreadable response: {}", e)))?;

        let text = response_text(parsed)?;
        debug!("Evaluation service returned {} characters", text.len());
        Ok(text)
    }
}

/// Concatenated text parts of the first candidate
fn response_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(SmartAtsError::EvaluationFailed(
            "service returned no text".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve_once, StubResponse};

    fn config(base_url: &str, timeout_secs: u64) -> EvaluationConfig {
        EvaluationConfig {
            enabled: true,
            base_url: base_url.to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs,
            api_key_env: "UNUSED".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn test_response_text_passes_through() {
        let raw = r#"{"candidates": [{"content": {"parts": [
            {"text": "{\"JD Match\": \"72%\", "},
            {"text": "\"MissingKeywords\": [\"kafka\"]}"}
        ], "role": "model"}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(
            response_text(parsed).unwrap(),
            r#"{"JD Match": "72%", "MissingKeywords": ["kafka"]}"#
        );
    }

    #[test]
    fn test_response_without_text_is_an_error() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(response_text(parsed), Err(SmartAtsError::EvaluationFailed(_))));

        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response_text(parsed).is_err());
    }

    #[test]
    fn test_endpoint() {
        let config = EvaluationConfig {
            enabled: true,
            base_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 5,
            api_key_env: "UNUSED".to_string(),
        };
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();
        assert_eq!(client.endpoint(), "https://example.test/v1beta/models/gemini-pro:generateContent");
    }

    #[test]
    fn test_from_env_requires_key() {
        let config = EvaluationConfig {
            enabled: true,
            base_url: "https://example.test".to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 5,
            api_key_env: "SMART_ATS_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        };
        assert!(matches!(
            GeminiClient::from_env(&config),
            Err(SmartAtsError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_evaluate_outlasts_configured_timeout() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "{\"JD Match\": \"80%\"}"}]}}]}"#;
        let (base_url, request) =
            serve_once(StubResponse::ok(body).delayed(Duration::from_millis(1500))).await;
        let client = GeminiClient::new(&config(&base_url, 1), "secret".to_string()).unwrap();

        let text = client.evaluate("rate this resume").await.unwrap();

        assert_eq!(text, r#"{"JD Match": "80%"}"#);
        let request = request.await.unwrap();
        assert!(request.starts_with("POST /models/gemini-pro:generateContent?key=secret"));
        assert!(request.contains(r#"{"contents":[{"parts":[{"text":"rate this resume"}]}]}"#));
    }

    #[tokio::test]
    async fn test_evaluate_reports_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        let (base_url, _request) = serve_once(StubResponse::status(400, body)).await;
        let client = GeminiClient::new(&config(&base_url, 5), "bad".to_string()).unwrap();

        match client.evaluate("prompt").await {
            Err(SmartAtsError::EvaluationFailed(message)) => {
                assert!(message.contains("400"));
                assert!(message.contains("API key not valid"));
            }
            other => panic!("expected EvaluationFailed, got {:?}", other),
        }
    }
}
