//! Configuration loading and validation.
//!
//! Configuration is read once at startup into an immutable [`Config`]. Secret
//! fields may only reference environment variables (`"env:VAR_NAME"`); when a
//! secret is not set in the file, a well-known environment variable is used.

use crate::error::{ConfigError, Result};
use crate::secrets::{Secret, match_leak_patterns};
use anyhow::Context as _;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

/// Environment variable holding the OpenAI key for the LLM and embedder.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the vector store connection string.
pub const CONNECTION_STRING_ENV: &str = "SUPABASE_CONNECTION_STRING";
/// Environment variable overriding the instance directory.
pub const INSTANCE_DIR_ENV: &str = "KNOCO_DIR";
/// Environment variable overriding the LLM model when no config file exists.
pub const LLM_MODEL_ENV: &str = "KNOCO_LLM_MODEL";

/// Top-level knoco configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instance root directory (~/.local/share/knoco or KNOCO_DIR).
    pub instance_dir: PathBuf,
    /// Chat model used for fact extraction.
    pub llm: LlmConfig,
    /// Embedding model the memory library uses for stored facts.
    pub embedder: EmbedderConfig,
    /// Vector database holding the embeddings.
    pub vector_store: VectorStoreConfig,
    /// Prompt and library settings.
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key: Option<Secret>,
    /// Full chat-completions URL. Defaults to the provider's public endpoint.
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o".into(),
            temperature: 0.2,
            max_tokens: 2000,
            api_key: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderProvider {
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub provider: EmbedderProvider,
    pub model: String,
    pub api_key: Option<Secret>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderProvider::OpenAi,
            model: "text-embedding-3-small".into(),
            api_key: None,
        }
    }
}

impl EmbedderConfig {
    /// Output width of the configured model, when it is a known one.
    pub fn known_dimensions(&self) -> Option<usize> {
        match (self.provider, self.model.as_str()) {
            (EmbedderProvider::OpenAi, "text-embedding-3-small") => Some(1536),
            (EmbedderProvider::OpenAi, "text-embedding-3-large") => Some(3072),
            (EmbedderProvider::OpenAi, "text-embedding-ada-002") => Some(1536),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorStoreProvider {
    Supabase,
}

/// pgvector index type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    Ivfflat,
    Hnsw,
}

/// Distance used for similarity search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMeasure {
    CosineDistance,
    L2Distance,
    L1Distance,
    MaxInnerProduct,
}

#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub provider: VectorStoreProvider,
    pub connection_string: Option<Secret>,
    pub collection_name: String,
    pub embedding_model_dims: usize,
    pub index_method: IndexMethod,
    pub index_measure: IndexMeasure,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            provider: VectorStoreProvider::Supabase,
            connection_string: None,
            collection_name: "knoco_memories".into(),
            embedding_model_dims: 1536,
            index_method: IndexMethod::Ivfflat,
            index_measure: IndexMeasure::CosineDistance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Prompt template replacing the built-in one. Relative paths resolve
    /// against the instance directory.
    pub custom_prompt_path: Option<PathBuf>,
    /// Memory library API version.
    pub version: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            custom_prompt_path: None,
            version: "v1.1".into(),
        }
    }
}

// -- Enum names --

macro_rules! named_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
                match value {
                    $($name => Ok(Self::$variant),)+
                    other => Err(ConfigError::UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

named_enum!(LlmProvider, "LLM provider", { OpenAi => "openai" });
named_enum!(EmbedderProvider, "embedder provider", { OpenAi => "openai" });
named_enum!(VectorStoreProvider, "vector store provider", { Supabase => "supabase" });
named_enum!(IndexMethod, "index method", { Ivfflat => "ivfflat", Hnsw => "hnsw" });
named_enum!(IndexMeasure, "index measure", {
    CosineDistance => "cosine_distance",
    L2Distance => "l2_distance",
    L1Distance => "l1_distance",
    MaxInnerProduct => "max_inner_product",
});

// -- TOML deserialization types --

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    llm: TomlLlmConfig,
    #[serde(default)]
    embedder: TomlEmbedderConfig,
    #[serde(default)]
    vector_store: TomlVectorStoreConfig,
    #[serde(default)]
    extraction: TomlExtractionConfig,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlLlmConfig {
    provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlEmbedderConfig {
    provider: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlVectorStoreConfig {
    provider: Option<String>,
    connection_string: Option<String>,
    collection_name: Option<String>,
    embedding_model_dims: Option<usize>,
    index_method: Option<String>,
    index_measure: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlExtractionConfig {
    custom_prompt_path: Option<String>,
    version: Option<String>,
}

/// Resolve a secret field. Only `"env:VAR_NAME"` references are accepted in
/// the file; an unset field falls back to `fallback_var`.
fn resolve_secret(
    field: &str,
    value: Option<&str>,
    fallback_var: &str,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<Option<Secret>> {
    let resolved = match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => match value.strip_prefix("env:") {
            Some(var_name) => env(var_name.trim()),
            None => {
                return Err(ConfigError::LiteralSecret {
                    field: field.to_string(),
                }
                .into());
            }
        },
        None => None,
    };

    Ok(resolved
        .or_else(|| env(fallback_var))
        .filter(|value| !value.is_empty())
        .map(Secret::new))
}

fn parse_or<T: FromStr<Err = ConfigError>>(value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(value) => Ok(value.trim().parse()?),
        None => Ok(default),
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

static COLLECTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("hardcoded regex"));

impl Config {
    /// Load configuration from the default config file, falling back to env vars.
    pub fn load() -> Result<Self> {
        let instance_dir = default_instance_dir();
        let config_path = instance_dir.join("config.toml");
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::load_from_env(&instance_dir)
        }
    }

    /// Load from a specific TOML config file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let instance_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        Self::from_toml_str(&content, instance_dir, &process_env)
    }

    /// Load from environment variables only (no config file).
    pub fn load_from_env(instance_dir: &Path) -> Result<Self> {
        Self::from_env(instance_dir.to_path_buf(), &process_env)
    }

    fn from_env(instance_dir: PathBuf, env: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let openai_key = env(OPENAI_API_KEY_ENV)
            .filter(|key| !key.is_empty())
            .map(Secret::new);

        let mut llm = LlmConfig {
            api_key: openai_key.clone(),
            ..LlmConfig::default()
        };
        if let Some(model) = env(LLM_MODEL_ENV).filter(|model| !model.is_empty()) {
            llm.model = model;
        }

        let config = Self {
            instance_dir,
            llm,
            embedder: EmbedderConfig {
                api_key: openai_key,
                ..EmbedderConfig::default()
            },
            vector_store: VectorStoreConfig {
                connection_string: env(CONNECTION_STRING_ENV)
                    .filter(|value| !value.is_empty())
                    .map(Secret::new),
                ..VectorStoreConfig::default()
            },
            extraction: ExtractionConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn from_toml_str(
        content: &str,
        instance_dir: PathBuf,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // Checked-in config must never carry a credential, in any field.
        if match_leak_patterns(content).is_some() {
            return Err(ConfigError::LiteralSecret {
                field: "config file".into(),
            }
            .into());
        }

        let toml_config: TomlConfig =
            toml::from_str(content).context("failed to parse config TOML")?;

        Self::from_toml(toml_config, instance_dir, env)
    }

    fn from_toml(
        toml: TomlConfig,
        instance_dir: PathBuf,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_llm = LlmConfig::default();
        let llm = LlmConfig {
            provider: parse_or(toml.llm.provider, base_llm.provider)?,
            model: toml.llm.model.unwrap_or(base_llm.model),
            temperature: toml.llm.temperature.unwrap_or(base_llm.temperature),
            max_tokens: toml.llm.max_tokens.unwrap_or(base_llm.max_tokens),
            api_key: resolve_secret(
                "llm.api_key",
                toml.llm.api_key.as_deref(),
                OPENAI_API_KEY_ENV,
                env,
            )?,
            base_url: toml.llm.base_url,
        };

        let base_embedder = EmbedderConfig::default();
        let embedder = EmbedderConfig {
            provider: parse_or(toml.embedder.provider, base_embedder.provider)?,
            model: toml.embedder.model.unwrap_or(base_embedder.model),
            api_key: resolve_secret(
                "embedder.api_key",
                toml.embedder.api_key.as_deref(),
                OPENAI_API_KEY_ENV,
                env,
            )?,
        };

        let base_store = VectorStoreConfig::default();
        let vector_store = VectorStoreConfig {
            provider: parse_or(toml.vector_store.provider, base_store.provider)?,
            connection_string: resolve_secret(
                "vector_store.connection_string",
                toml.vector_store.connection_string.as_deref(),
                CONNECTION_STRING_ENV,
                env,
            )?,
            collection_name: toml
                .vector_store
                .collection_name
                .unwrap_or(base_store.collection_name),
            embedding_model_dims: toml
                .vector_store
                .embedding_model_dims
                .unwrap_or(base_store.embedding_model_dims),
            index_method: parse_or(toml.vector_store.index_method, base_store.index_method)?,
            index_measure: parse_or(toml.vector_store.index_measure, base_store.index_measure)?,
        };

        let base_extraction = ExtractionConfig::default();
        let extraction = ExtractionConfig {
            custom_prompt_path: toml
                .extraction
                .custom_prompt_path
                .map(|path| instance_dir.join(path)),
            version: toml.extraction.version.unwrap_or(base_extraction.version),
        };

        let config = Config {
            instance_dir,
            llm,
            embedder,
            vector_store,
            extraction,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check ranges and cross-field consistency.
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(invalid("llm.model must not be empty"));
        }
        if !(self.llm.temperature.is_finite() && (0.0..=2.0).contains(&self.llm.temperature)) {
            return Err(invalid(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(invalid("llm.max_tokens must be greater than zero"));
        }
        if let Some(base_url) = &self.llm.base_url
            && !(base_url.starts_with("https://") || base_url.starts_with("http://"))
        {
            return Err(invalid(format!(
                "llm.base_url must be an http(s) URL, got `{base_url}`"
            )));
        }

        if self.embedder.model.trim().is_empty() {
            return Err(invalid("embedder.model must not be empty"));
        }

        let dims = self.vector_store.embedding_model_dims;
        if dims == 0 {
            return Err(invalid("vector_store.embedding_model_dims must be greater than zero"));
        }
        if let Some(expected) = self.embedder.known_dimensions()
            && expected != dims
        {
            return Err(invalid(format!(
                "vector_store.embedding_model_dims is {dims} but {} produces {expected}-dimensional vectors",
                self.embedder.model
            )));
        }

        if !COLLECTION_NAME.is_match(&self.vector_store.collection_name) {
            return Err(invalid(format!(
                "vector_store.collection_name `{}` is not a valid table name",
                self.vector_store.collection_name
            )));
        }

        Ok(())
    }

    /// Path to the instance prompts directory.
    pub fn prompts_dir(&self) -> PathBuf {
        self.instance_dir.join("prompts")
    }
}

fn invalid(message: impl Into<String>) -> crate::Error {
    ConfigError::Invalid(message.into()).into()
}

/// `KNOCO_DIR`, else the platform data directory, else `./.knoco`.
pub fn default_instance_dir() -> PathBuf {
    std::env::var(INSTANCE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_dir()
                .map(|d| d.join("knoco"))
                .unwrap_or_else(|| PathBuf::from("./.knoco"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use indoc::indoc;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn load(content: &str, env: &[(&str, &str)]) -> Result<Config> {
        Config::from_toml_str(content, PathBuf::from("/srv/knoco"), &env_of(env))
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = load("", &[]).unwrap();

        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.max_tokens, 2000);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.embedder.model, "text-embedding-3-small");
        assert_eq!(config.vector_store.provider, VectorStoreProvider::Supabase);
        assert_eq!(config.vector_store.collection_name, "knoco_memories");
        assert_eq!(config.vector_store.embedding_model_dims, 1536);
        assert_eq!(config.vector_store.index_method, IndexMethod::Ivfflat);
        assert_eq!(config.vector_store.index_measure, IndexMeasure::CosineDistance);
        assert_eq!(config.extraction.version, "v1.1");
        assert_eq!(config.prompts_dir(), PathBuf::from("/srv/knoco/prompts"));
    }

    #[test]
    fn file_values_override_defaults() {
        let config = load(
            indoc! {r#"
                [llm]
                model = "gpt-4o-mini"
                temperature = 0.0
                max_tokens = 1024
                base_url = "https://llm.internal/v1/chat/completions"

                [embedder]
                model = "text-embedding-3-large"

                [vector_store]
                collection_name = "acme_memories"
                embedding_model_dims = 3072
                index_method = "hnsw"
                index_measure = "l2_distance"

                [extraction]
                custom_prompt_path = "prompts/consulting.md"
                version = "v1.0"
            "#},
            &[],
        )
        .unwrap();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(
            config.llm.base_url.as_deref(),
            Some("https://llm.internal/v1/chat/completions")
        );
        assert_eq!(config.vector_store.collection_name, "acme_memories");
        assert_eq!(config.vector_store.index_method, IndexMethod::Hnsw);
        assert_eq!(config.vector_store.index_measure, IndexMeasure::L2Distance);
        assert_eq!(
            config.extraction.custom_prompt_path,
            Some(PathBuf::from("/srv/knoco/prompts/consulting.md"))
        );
        assert_eq!(config.extraction.version, "v1.0");
    }

    #[test]
    fn env_references_resolve_secrets() {
        let config = load(
            indoc! {r#"
                [llm]
                api_key = "env:KNOCO_LLM_KEY"

                [vector_store]
                connection_string = "env:DB_URL"
            "#},
            &[
                ("KNOCO_LLM_KEY", "llm-key"),
                ("DB_URL", "postgresql://db.internal/postgres"),
            ],
        )
        .unwrap();

        assert_eq!(config.llm.api_key.unwrap().expose(), "llm-key");
        assert_eq!(
            config.vector_store.connection_string.unwrap().expose(),
            "postgresql://db.internal/postgres"
        );
        assert!(config.embedder.api_key.is_none());
    }

    #[test]
    fn unset_secrets_fall_back_to_well_known_env_vars() {
        let config = load(
            "",
            &[
                (OPENAI_API_KEY_ENV, "shared-key"),
                (CONNECTION_STRING_ENV, "postgresql://db.internal/postgres"),
            ],
        )
        .unwrap();

        assert_eq!(config.llm.api_key.unwrap().expose(), "shared-key");
        assert_eq!(config.embedder.api_key.unwrap().expose(), "shared-key");
        assert!(config.vector_store.connection_string.is_some());
    }

    #[test]
    fn unresolved_env_reference_falls_back() {
        let config = load(
            "[llm]\napi_key = \"env:MISSING_VAR\"\n",
            &[(OPENAI_API_KEY_ENV, "shared-key")],
        )
        .unwrap();
        assert_eq!(config.llm.api_key.unwrap().expose(), "shared-key");
    }

    #[test]
    fn literal_secrets_are_rejected() {
        let result = load("[llm]\napi_key = \"YOUR_OPENAI_API_KEY\"\n", &[]);
        match result {
            Err(Error::Config(ConfigError::LiteralSecret { field })) => {
                assert_eq!(field, "llm.api_key")
            }
            other => panic!("expected LiteralSecret, got {other:?}"),
        }

        let result = load(
            "[vector_store]\nconnection_string = \"postgresql://postgres.x:pw@db.example.com:6543/postgres\"\n",
            &[],
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::LiteralSecret { .. }))
        ));
    }

    #[test]
    fn credentials_anywhere_in_the_file_are_rejected() {
        let result = load(
            "[llm]\nmodel = \"gpt-4o\" # old key sk-abcdefghijklmnopqrstuvwxyz\n",
            &[],
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::LiteralSecret { .. }))
        ));
    }

    #[test]
    fn hyphenated_paths_are_not_mistaken_for_credentials() {
        let config = load(
            "[extraction]\ncustom_prompt_path = \"prompts/desk-research-consulting-v2.md\"\n",
            &[],
        )
        .unwrap();
        assert_eq!(
            config.extraction.custom_prompt_path,
            Some(PathBuf::from("/srv/knoco/prompts/desk-research-consulting-v2.md"))
        );
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let result = load("[vector_store]\nindex_method = \"ivf\"\n", &[]);
        match result {
            Err(Error::Config(ConfigError::UnknownValue { kind, value })) => {
                assert_eq!(kind, "index method");
                assert_eq!(value, "ivf");
            }
            other => panic!("expected UnknownValue, got {other:?}"),
        }

        assert!(load("[llm]\nprovider = \"anthropic\"\n", &[]).is_err());
        assert!(load("[vector_store]\nprovider = \"qdrant\"\n", &[]).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(load("[llm]\ntemprature = 0.5\n", &[]).is_err());
        assert!(load("[telemetry]\nenabled = true\n", &[]).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(load("[llm]\ntemperature = 2.5\n", &[]).is_err());
        assert!(load("[llm]\nmax_tokens = 0\n", &[]).is_err());
        assert!(load("[llm]\nbase_url = \"llm.internal\"\n", &[]).is_err());
        assert!(load("[vector_store]\nembedding_model_dims = 0\n", &[]).is_err());
        assert!(load("[vector_store]\ncollection_name = \"drop table\"\n", &[]).is_err());
    }

    #[test]
    fn dimensions_must_match_known_embedder() {
        let result = load("[vector_store]\nembedding_model_dims = 768\n", &[]);
        assert!(matches!(result, Err(Error::Config(ConfigError::Invalid(_)))));

        // Unknown models are not cross-checked.
        let config = load(
            "[embedder]\nmodel = \"custom-embedder\"\n[vector_store]\nembedding_model_dims = 768\n",
            &[],
        )
        .unwrap();
        assert_eq!(config.vector_store.embedding_model_dims, 768);
    }

    #[test]
    fn env_only_mode_reads_well_known_variables() {
        let config = Config::from_env(
            PathBuf::from("/srv/knoco"),
            &env_of(&[
                (OPENAI_API_KEY_ENV, "shared-key"),
                (LLM_MODEL_ENV, "gpt-4.1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.llm.model, "gpt-4.1");
        assert_eq!(config.llm.api_key.unwrap().expose(), "shared-key");
        assert_eq!(config.embedder.api_key.unwrap().expose(), "shared-key");
        assert!(config.vector_store.connection_string.is_none());
    }

    #[test]
    fn missing_credentials_do_not_fail_loading() {
        let config = Config::from_env(PathBuf::from("/srv/knoco"), &env_of(&[])).unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn load_from_path_uses_parent_as_instance_dir() {
        let temp_dir = tempfile::tempdir().expect("temp dir should be created");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[vector_store]\nindex_method = \"hnsw\"\n")
            .expect("config.toml should be written");

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.instance_dir, temp_dir.path());
        assert_eq!(config.vector_store.index_method, IndexMethod::Hnsw);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load("", &[(OPENAI_API_KEY_ENV, "super-secret-value")]).unwrap();
        let rendered = format!("{config:#?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn enum_names_round_trip() {
        for method in [IndexMethod::Ivfflat, IndexMethod::Hnsw] {
            assert_eq!(method.as_str().parse::<IndexMethod>().unwrap(), method);
        }
        for measure in [
            IndexMeasure::CosineDistance,
            IndexMeasure::L2Distance,
            IndexMeasure::L1Distance,
            IndexMeasure::MaxInnerProduct,
        ] {
            assert_eq!(measure.to_string().parse::<IndexMeasure>().unwrap(), measure);
        }
    }
}
