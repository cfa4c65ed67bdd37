//! Gemini AI provider implementation.
//!
//! Implements text generation using Google's Gemini `generateContent` API.

use super::{
    http_client, network_error, status_error, FinishReason, Generation, GenerationRequest,
    ProviderError, TextProvider,
};
use crate::config::GeminiConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini text provider.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(config, timeout, GEMINI_API_BASE)
    }

    pub fn with_base_url(
        config: GeminiConfig,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            config,
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Build the API URL for the configured model and method. The key travels
    /// in a header so it never shows up in URLs or logs.
    fn api_url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.config.model, method)
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            max_tokens = request.max_tokens,
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(status_error("Gemini", response).await);
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        let finish_reason = match candidate.finish_reason.as_deref() {
            Some("SAFETY") => return Err(ProviderError::ContentFiltered),
            Some("MAX_TOKENS") => FinishReason::Length,
            _ => FinishReason::Complete,
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let usage = api_response.usage_metadata.unwrap_or_default();

        Ok(Generation {
            text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            finish_reason,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, Uri},
        Json, Router,
    };
    use secrecy::Secret;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn fake_api(body: Value) -> String {
        let app = Router::new().fallback(
            move |uri: Uri, headers: HeaderMap, Json(req): Json<Value>| async move {
                assert_eq!(uri.path(), "/models/gemini-2.0-flash:generateContent");
                assert_eq!(headers["x-goog-api-key"], "g-key");
                assert_eq!(
                    req["systemInstruction"]["parts"][0]["text"],
                    "You are an expert course creator"
                );
                assert_eq!(req["generationConfig"]["maxOutputTokens"], 200);
                Json(body)
            },
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{}", addr)
    }

    fn provider(base: &str) -> GeminiProvider {
        GeminiProvider::with_base_url(
            GeminiConfig {
                api_key: Secret::new("g-key".to_string()),
                model: "gemini-2.0-flash".to_string(),
            },
            Duration::from_secs(5),
            base,
        )
        .unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "You are an expert course creator".to_string(),
            prompt: "Rust in 100 words write the course for students.".to_string(),
            max_tokens: 200,
        }
    }

    #[tokio::test]
    async fn joins_candidate_parts() {
        let base = fake_api(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Week 1. "}, {"text": "Week 2."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 9, "candidatesTokenCount": 4}
        }))
        .await;

        let generation = provider(&base).generate(&request()).await.unwrap();
        assert_eq!(generation.text, "Week 1. Week 2.");
        assert_eq!(generation.input_tokens, 9);
        assert_eq!(generation.output_tokens, 4);
    }

    #[tokio::test]
    async fn safety_block_is_content_filtered() {
        let base = fake_api(json!({"candidates": [{"finishReason": "SAFETY"}]})).await;

        let err = provider(&base).generate(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ContentFiltered));
    }

    #[tokio::test]
    async fn no_candidates_is_empty_response() {
        let base = fake_api(json!({})).await;

        let err = provider(&base).generate(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }
}
