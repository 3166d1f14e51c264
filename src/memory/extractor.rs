//! The fact extraction seam and its LLM-backed implementation.

use super::parse::parse_fact_batch;
use super::prompt;
use super::types::FactBatch;
use crate::error::Result;
use crate::hooks::{ExtractionHook, LeakGuard};
use crate::llm::CompletionBackend;

use std::sync::Arc;

/// Turns conversational text into validated facts.
///
/// Blank or irrelevant input yields an empty batch, never an error.
/// Implementations must only return batches that pass
/// [`FactBatch::validate`].
#[async_trait::async_trait]
pub trait FactExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<FactBatch>;
}

/// Extracts facts by prompting a chat model.
pub struct LlmFactExtractor {
    backend: Arc<dyn CompletionBackend>,
    system_prompt: String,
    hook: Arc<dyn ExtractionHook>,
}

impl LlmFactExtractor {
    /// Create an extractor with an already rendered system prompt and the
    /// default [`LeakGuard`] hook.
    pub fn new(backend: Arc<dyn CompletionBackend>, system_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.into(),
            hook: Arc::new(LeakGuard::new()),
        }
    }

    /// Create an extractor using the built-in prompt.
    pub fn with_default_prompt(backend: Arc<dyn CompletionBackend>) -> Result<Self> {
        Ok(Self::new(backend, prompt::default_prompt()?))
    }

    pub fn with_hook(mut self, hook: Arc<dyn ExtractionHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait::async_trait]
impl FactExtractor for LlmFactExtractor {
    async fn extract(&self, text: &str) -> Result<FactBatch> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(FactBatch::empty());
        }

        let model = self.backend.model();
        self.hook.on_completion_call(model, text);

        let user_message = format!("Input: {text}");
        let response = self
            .backend
            .complete(&self.system_prompt, &user_message)
            .await?;
        self.hook.on_completion_response(model, &response);

        let mut batch = parse_fact_batch(&response).inspect_err(|error| {
            tracing::warn!(model = %model, %error, "extraction response rejected");
        })?;
        self.hook.on_facts(&mut batch);

        tracing::debug!(model = %model, facts = batch.len(), "facts extracted");
        Ok(batch)
    }
}
