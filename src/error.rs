//! Error types for configuration, LLM calls, and fact extraction.

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error. Each concern has its own enum so callers can match on the
/// failure they care about.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("unknown {kind} `{value}`")]
    UnknownValue { kind: &'static str, value: String },

    /// A credential was written into the config file instead of referenced
    /// through `env:VAR_NAME`.
    #[error("literal secret in `{field}`; reference it as \"env:VAR_NAME\" instead")]
    LiteralSecret { field: String },
}

/// Failures talking to the LLM provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("no API key configured for provider `{0}`")]
    MissingProviderKey(String),

    #[error("unknown LLM provider `{0}`")]
    UnknownProvider(String),

    #[error("completion request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    ProviderError { status: u16, body: String },

    #[error("provider returned no completion content")]
    EmptyResponse,
}

/// The LLM answered, but not with a well-formed `{"facts": [...]}` payload.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction response is empty")]
    EmptyResponse,

    #[error("extraction response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("extraction response is not a JSON object")]
    NotAnObject,

    #[error("extraction response has no `facts` key")]
    MissingFacts,

    #[error("extraction response has unexpected key `{0}`")]
    UnexpectedKey(String),

    #[error("`facts` is not an array")]
    FactsNotArray,

    #[error("fact {index} is a bare string; facts must be objects with `type` and `content`")]
    PrefixedString { index: usize },

    #[error("fact {index} is invalid: {reason}")]
    InvalidFact { index: usize, reason: String },
}
