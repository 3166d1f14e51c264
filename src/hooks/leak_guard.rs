//! LeakGuard: logs extraction calls and scrubs credentials from facts.
//!
//! Facts are stored long-term and replayed into future prompts, so a key
//! pasted into a meeting transcript must not survive extraction.

use super::ExtractionHook;
use crate::memory::FactBatch;
use crate::secrets::scrub;

/// Default extraction hook.
#[derive(Debug, Clone, Default)]
pub struct LeakGuard;

impl LeakGuard {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionHook for LeakGuard {
    fn on_completion_call(&self, model: &str, input: &str) {
        tracing::debug!(
            model = %model,
            input_chars = input.chars().count(),
            "extraction completion call started"
        );
    }

    fn on_completion_response(&self, model: &str, response: &str) {
        tracing::debug!(
            model = %model,
            response_chars = response.chars().count(),
            "extraction completion response received"
        );
    }

    fn on_facts(&self, batch: &mut FactBatch) {
        for (index, fact) in batch.facts.iter_mut().enumerate() {
            let mut redactions = scrub(&mut fact.content);

            for value in fact.metadata.values_mut() {
                if let serde_json::Value::String(text) = value {
                    redactions += scrub(text);
                }
            }

            if redactions > 0 {
                // The secret itself is never logged.
                tracing::warn!(
                    fact_index = index,
                    fact_type = %fact.fact_type,
                    redactions,
                    "potential secret leak redacted from extracted fact"
                );
            }
        }
    }
}
