//! Observation hooks around LLM extraction.

pub mod leak_guard;

pub use leak_guard::LeakGuard;

use crate::memory::FactBatch;

/// Callbacks invoked by [`LlmFactExtractor`](crate::memory::LlmFactExtractor)
/// at each stage of an extraction. All methods default to no-ops.
pub trait ExtractionHook: Send + Sync {
    /// Called before the completion request is sent.
    fn on_completion_call(&self, _model: &str, _input: &str) {}

    /// Called with the raw completion text, before parsing.
    fn on_completion_response(&self, _model: &str, _response: &str) {}

    /// Called with the parsed batch. May rewrite facts in place.
    fn on_facts(&self, _batch: &mut FactBatch) {}
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl ExtractionHook for NoopHook {}
