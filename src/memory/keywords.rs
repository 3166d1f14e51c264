//! Offline keyword extraction.
//!
//! A deterministic stand-in for the LLM extractor: each sentence is matched
//! against one regex per fact type, in priority order, and the first match
//! wins. Useful without network access and as a baseline in tests.

use super::extractor::FactExtractor;
use super::types::{Fact, FactBatch, FactType};
use crate::error::Result;

use regex::Regex;
use std::sync::LazyLock;

/// Confidence assigned to every keyword match.
const KEYWORD_CONFIDENCE: f64 = 0.6;

/// Longest content emitted for a single fact, in characters, final period included.
const MAX_CONTENT_CHARS: usize = 500;

/// Per-type patterns, in priority order.
static TYPE_PATTERNS: LazyLock<Vec<(FactType, Regex)>> = LazyLock::new(|| {
    vec![
        (
            FactType::Decision,
            Regex::new(
                r"(?i)\b(decided|decision|we'll go with|going with|agreed to use|opted for|chose to|selected)\b",
            )
            .expect("hardcoded regex"),
        ),
        (
            FactType::ClientContext,
            Regex::new(
                r"(?i)\bclient(?:'s|s)?\b.*\b(needs?|wants?|prefers?|requires?|mentioned|expects?|doesn't like|dislikes?|can't|cannot|constraint)\b",
            )
            .expect("hardcoded regex"),
        ),
        (
            FactType::Issue,
            Regex::new(
                r"(?i)\b(problem|issue|challenge|blocker|blocked|risk|concern|bug|broken|failing|delayed|behind schedule)\b",
            )
            .expect("hardcoded regex"),
        ),
        (
            FactType::Action,
            Regex::new(
                r"(?i)\b(we should|need to|will send|schedule|follow up|next step|action item|to-do|assign(?:ed)? to|by (?:monday|tuesday|wednesday|thursday|friday))\b",
            )
            .expect("hardcoded regex"),
        ),
        (
            FactType::ProjectContext,
            Regex::new(r"(?i)\b(project|scope|timeline|milestone|phase|objective|kickoff|go-live)\b")
                .expect("hardcoded regex"),
        ),
        (
            FactType::Reference,
            Regex::new(
                r"(?i)\b(document|documentation|whitepaper|report titled|guideline|best practices?|framework|according to|see the)\b",
            )
            .expect("hardcoded regex"),
        ),
        (
            FactType::Learning,
            Regex::new(r"(?i)\b(learned|lesson|takeaway|in hindsight|next time|insight|realized)\b")
                .expect("hardcoded regex"),
        ),
    ]
});

/// Leading discourse markers dropped from a sentence before it becomes content.
static LEADING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:so|well|okay|ok|also|anyway|basically|um|uh)\b[,\s]+)+")
        .expect("hardcoded regex")
});

/// Sentence terminator: end punctuation followed by whitespace or end of input,
/// or a line break.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?]+(?:\s+|$)|[\r\n]+").expect("hardcoded regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex"));

/// Rule-based [`FactExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction; the trait impl delegates here.
    pub fn extract_sync(&self, text: &str) -> FactBatch {
        split_sentences(text)
            .into_iter()
            .filter_map(classify_sentence)
            .collect()
    }
}

#[async_trait::async_trait]
impl FactExtractor for KeywordExtractor {
    async fn extract(&self, text: &str) -> Result<FactBatch> {
        let batch = self.extract_sync(text);
        tracing::debug!(facts = batch.len(), "keyword extraction finished");
        Ok(batch)
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(text) {
        let line_break = boundary.as_str().contains(['\n', '\r']);
        let continues_lowercase = text[boundary.end()..]
            .chars()
            .next()
            .is_some_and(char::is_lowercase);
        // "the U.S. rollout", "e.g. the": an abbreviation, not a sentence end.
        if !line_break && continues_lowercase {
            continue;
        }
        sentences.push(&text[start..boundary.start()]);
        start = boundary.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

fn classify_sentence(sentence: &str) -> Option<Fact> {
    let (fact_type, matched) = TYPE_PATTERNS.iter().find_map(|(fact_type, regex)| {
        regex
            .captures(sentence)
            .and_then(|captures| captures.get(1))
            .map(|matched| (*fact_type, matched.as_str().to_lowercase()))
    })?;

    let content = normalize_statement(sentence)?;

    Some(
        Fact::new(fact_type, content)
            .with_metadata("extractor", "keyword")
            .with_metadata("matched", matched)
            .with_confidence(KEYWORD_CONFIDENCE),
    )
}

/// Turn a raw sentence into a single declarative statement.
fn normalize_statement(sentence: &str) -> Option<String> {
    let without_filler = LEADING_FILLER.replace(sentence.trim(), "");
    let collapsed = WHITESPACE.replace_all(without_filler.trim(), " ");
    let collapsed = collapsed.trim_end_matches([',', ';', ':']).trim();

    let mut characters = collapsed.chars();
    let first = characters.next()?;
    let mut statement: String = first.to_uppercase().chain(characters).collect();

    if statement.chars().count() >= MAX_CONTENT_CHARS {
        statement = statement.chars().take(MAX_CONTENT_CHARS - 1).collect();
    }
    statement.push('.');
    Some(statement)
}
