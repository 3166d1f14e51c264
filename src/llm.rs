//! Chat-completion backend for fact extraction.
//!
//! Deliberately small: one request, one response, no retries. Anything that
//! can turn a system prompt and a user message into text implements
//! [`CompletionBackend`].

pub mod openai;

pub use openai::OpenAiBackend;

use crate::error::Result;

/// Produces the raw completion text for a prompt pair.
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
