//! Fact extraction for consultant memories.

pub mod extractor;
pub mod keywords;
pub mod parse;
pub mod prompt;
pub mod types;

pub use extractor::{FactExtractor, LlmFactExtractor};
pub use keywords::KeywordExtractor;
pub use parse::parse_fact_batch;
pub use prompt::{default_prompt, fact_batch_schema, load_prompt, render_prompt};
pub use types::{Fact, FactBatch, FactType};
