//! Course lifecycle: generate, store, read back and remove.

use super::metrics;
use super::providers::{Generation, GenerationRequest, ProviderError, TextProvider};
use super::store::ResourceStore;
use crate::config::GenerationConfig;
use crate::models::CourseBrief;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Course id → generated content.
pub type CourseStore = ResourceStore<String>;

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("Course ID already exists.")]
    AlreadyExists,

    #[error("Course not found.")]
    NotFound,

    #[error(transparent)]
    Generation(#[from] ProviderError),
}

impl From<CourseError> for AppError {
    fn from(err: CourseError) -> Self {
        let message = err.to_string();
        match err {
            CourseError::AlreadyExists => AppError::Conflict(anyhow::anyhow!(message)),
            CourseError::NotFound => AppError::NotFound(anyhow::anyhow!(message)),
            CourseError::Generation(_) => AppError::Upstream(message),
        }
    }
}

/// Owns the store and the provider. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CourseService {
    store: CourseStore,
    provider: Arc<dyn TextProvider>,
    generation: GenerationConfig,
}

impl CourseService {
    pub fn new(
        store: CourseStore,
        provider: Arc<dyn TextProvider>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            store,
            provider,
            generation,
        }
    }

    pub fn provider(&self) -> &dyn TextProvider {
        self.provider.as_ref()
    }

    /// Generate content for a new id and store it.
    ///
    /// The id stays locked from the existence check until the write, so a
    /// concurrent create of the same id sees the conflict rather than racing.
    pub async fn create(&self, id: &str, brief: &CourseBrief) -> Result<String, CourseError> {
        let entry = self.store.lock(id).await;
        if entry.exists() {
            return Err(CourseError::AlreadyExists);
        }

        let content = self.generate(id, brief).await?;
        entry.insert(content.clone());
        self.record_size();

        tracing::info!(course_id = %id, content_len = content.len(), "Course created");
        Ok(content)
    }

    pub fn get(&self, id: &str) -> Result<String, CourseError> {
        self.store.get(id).ok_or(CourseError::NotFound)
    }

    pub fn list(&self) -> HashMap<String, String> {
        self.store.snapshot()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.store.contains(id)
    }

    /// Regenerate content for an existing id. On failure the old content stays.
    pub async fn update(&self, id: &str, brief: &CourseBrief) -> Result<String, CourseError> {
        let entry = self.store.lock(id).await;
        if !entry.exists() {
            return Err(CourseError::NotFound);
        }

        let content = self.generate(id, brief).await?;
        entry.insert(content.clone());

        tracing::info!(course_id = %id, content_len = content.len(), "Course updated");
        Ok(content)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CourseError> {
        let entry = self.store.lock(id).await;
        entry.remove().ok_or(CourseError::NotFound)?;
        self.record_size();

        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }

    /// One provider call, bounded by the configured timeout.
    async fn generate(&self, id: &str, brief: &CourseBrief) -> Result<String, CourseError> {
        let request = GenerationRequest {
            system: self.generation.system_prompt.clone(),
            prompt: brief.prompt(),
            max_tokens: self.generation.max_tokens,
        };
        let provider = self.provider.name();
        let start = Instant::now();

        let result =
            match tokio::time::timeout(self.generation.timeout, self.provider.generate(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.generation.timeout.as_secs())),
            };
        let elapsed = start.elapsed();

        match result {
            Ok(Generation {
                text,
                input_tokens,
                output_tokens,
                finish_reason,
            }) => {
                metrics::record_generation(provider, "success", elapsed);
                tracing::info!(
                    course_id = %id,
                    provider,
                    prompt_len = request.prompt.len(),
                    input_tokens,
                    output_tokens,
                    finish_reason = finish_reason.as_str(),
                    latency_ms = elapsed.as_millis() as u64,
                    "Course content generated"
                );
                Ok(text)
            }
            Err(e) => {
                metrics::record_generation(provider, "error", elapsed);
                tracing::error!(
                    course_id = %id,
                    provider,
                    error = %e,
                    latency_ms = elapsed.as_millis() as u64,
                    "Course generation failed"
                );
                Err(CourseError::Generation(e))
            }
        }
    }

    fn record_size(&self) {
        metrics::record_stored(self.store.len());
    }
}
