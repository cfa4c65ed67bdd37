//! Text-generation provider abstraction and implementations.
//!
//! The service talks to whichever backend is configured through
//! [`TextProvider`]; tests and key-less local runs use [`mock::MockProvider`].

pub mod gemini;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Content filtered by provider")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Provider did not respond within {0} seconds")]
    Timeout(u64),
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
        }
    }
}

/// One completion request: system role, user prompt and a response-length cap.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Successful completion. Failures are always the `Err` side of
/// `Result<Generation, ProviderError>`.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,

    /// Input tokens consumed, when the provider reports them.
    pub input_tokens: u32,

    /// Output tokens generated, when the provider reports them.
    pub output_tokens: u32,

    pub finish_reason: FinishReason,
}

/// Trait for text generation providers (OpenAI, Gemini, mock).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Generate a completion for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError>;

    /// Cheap readiness check. Does not call the remote API.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Shared HTTP client for the remote providers.
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

/// Map a reqwest send error onto the provider taxonomy.
pub(crate) fn network_error(err: reqwest::Error, timeout: std::time::Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout.as_secs())
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}

/// Turn a non-success response into a provider error, keeping the body text.
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited;
    }
    let error_text = response.text().await.unwrap_or_default();
    ProviderError::ApiError(format!("{} API error {}: {}", provider, status, error_text))
}
