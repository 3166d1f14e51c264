//! Strict parsing of LLM extraction output.
//!
//! The model is asked for `{"facts": [...]}` and nothing else. Anything that
//! does not match that shape is rejected with an [`ExtractionError`] rather
//! than repaired. The one allowance is a surrounding Markdown code fence,
//! which chat models add even in JSON mode.

use super::types::{Fact, FactBatch};
use crate::error::ExtractionError;

/// Parse and validate a raw completion into a [`FactBatch`].
pub fn parse_fact_batch(raw: &str) -> Result<FactBatch, ExtractionError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(ExtractionError::InvalidJson)?;

    let serde_json::Value::Object(mut envelope) = value else {
        return Err(ExtractionError::NotAnObject);
    };

    let facts = envelope.remove("facts").ok_or(ExtractionError::MissingFacts)?;
    if let Some(key) = envelope.keys().next() {
        return Err(ExtractionError::UnexpectedKey(key.clone()));
    }

    let serde_json::Value::Array(items) = facts else {
        return Err(ExtractionError::FactsNotArray);
    };

    let facts = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_fact(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FactBatch::new(facts))
}

fn parse_fact(index: usize, item: serde_json::Value) -> Result<Fact, ExtractionError> {
    if item.is_string() {
        return Err(ExtractionError::PrefixedString { index });
    }

    let fact: Fact = serde_json::from_value(item).map_err(|error| ExtractionError::InvalidFact {
        index,
        reason: error.to_string(),
    })?;

    fact.validate()
        .map_err(|reason| ExtractionError::InvalidFact { index, reason })?;

    Ok(fact)
}

/// Remove one surrounding ```` ``` ```` fence (with or without a language tag).
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        Some(_) => inner.trim(),
        None => {
            let untagged = inner
                .trim_start()
                .trim_start_matches(|character: char| character.is_ascii_alphabetic());
            if untagged.trim_start().starts_with(['{', '[']) {
                untagged.trim()
            } else {
                inner.trim()
            }
        }
    }
}
