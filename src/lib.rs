//! knoco: structured fact extraction from consultant conversations.
//!
//! Converts free-text transcript segments into typed memory facts
//! (decisions, issues, actions, client and project context, references,
//! learnings) and describes the vector store, embedder, and LLM the memory
//! library is wired to.

pub mod config;
pub mod error;
pub mod hooks;
pub mod llm;
pub mod memory;
pub mod secrets;

pub use config::Config;
pub use error::{Error, Result};
pub use memory::{Fact, FactBatch, FactExtractor, FactType, KeywordExtractor, LlmFactExtractor};
