//! Extraction prompt rendering.
//!
//! The few-shot examples are built from [`FactBatch`] values and serialized
//! with the same code the parser reads, so the prompt can never show the model
//! a shape that [`parse_fact_batch`](super::parse::parse_fact_batch) rejects.

use super::types::{Fact, FactBatch, FactType};
use crate::error::Result;
use anyhow::Context as _;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name looked up under `<instance_dir>/prompts/` for an override.
pub const PROMPT_OVERRIDE_FILE: &str = "FACT_EXTRACTION.md";

const BUILTIN_TEMPLATE: &str = indoc::indoc! {r#"
    You are a professional consultant memory system designed to extract valuable information from conversations.
    Your task is to identify and extract key information that consultants would need to reference later.

    Pay special attention to the following types of information:

    {% for category in categories -%}
    {{ loop.index }}. {{ category.name }}: {{ category.description }}
    {% endfor %}
    For each memory you identify, extract:
    - The specific type from the list above, written exactly as shown
    - The core content as a clear, concise, single-sentence statement (not a verbatim quote)
    - Relevant metadata about the memory (people involved, project name, importance, etc.)
    - Your confidence level in this extraction (0.0-1.0)

    Only extract statements that clearly fit one of the types. Leave out anything that does not.
    If you don't find any relevant information to extract, return an empty array: {"facts": []}

    Format your response as a JSON object with a single "facts" key holding an array of objects
    with the keys "type", "content", "metadata", and "confidence". Do not return plain strings.

    Here are some few shot examples:
    {% for example in examples %}
    Input: {{ example.input }}
    Output: {{ example.output }}
    {% endfor %}
    Return the facts in a json format as shown above.
"#};

#[derive(Serialize)]
struct CategoryContext {
    name: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct ExampleContext {
    input: &'static str,
    output: String,
}

/// A worked input/output pair shown to the model.
pub struct FewShotExample {
    pub input: &'static str,
    pub output: FactBatch,
}

/// The built-in few-shot examples.
pub fn few_shot_examples() -> Vec<FewShotExample> {
    vec![
        FewShotExample {
            input: "We decided to use AWS instead of Azure for the cloud infrastructure because of the client's existing AWS expertise.",
            output: FactBatch::new(vec![
                Fact::new(
                    FactType::Decision,
                    "The team decided to use AWS over Azure for cloud infrastructure due to the client's existing AWS expertise.",
                )
                .with_metadata("alternatives", "Azure")
                .with_metadata("rationale", "client's existing AWS expertise")
                .with_confidence(0.95),
            ]),
        },
        FewShotExample {
            input: "The client mentioned they need the final report by next Friday and it must include a detailed cost breakdown.",
            output: FactBatch::new(vec![
                Fact::new(
                    FactType::ClientContext,
                    "Client requires the final report by next Friday with a detailed cost breakdown.",
                )
                .with_metadata("deadline", "next Friday")
                .with_confidence(0.9),
            ]),
        },
        FewShotExample {
            input: "We should probably schedule a meeting with the finance team to discuss budget implications.",
            output: FactBatch::new(vec![
                Fact::new(
                    FactType::Action,
                    "Schedule a meeting with finance team to discuss budget implications",
                )
                .with_metadata("priority", "medium")
                .with_metadata("department", "finance")
                .with_confidence(0.9),
            ]),
        },
        FewShotExample {
            input: "The client doesn't like our proposed solution because they had a negative experience with a similar approach last year.",
            output: FactBatch::new(vec![
                Fact::new(
                    FactType::ClientContext,
                    "Client dislikes proposed solution due to negative experience with similar approach last year",
                )
                .with_metadata("sentiment", "negative")
                .with_metadata("experience", "historical")
                .with_confidence(0.95),
            ]),
        },
        FewShotExample {
            input: "After analyzing three options, we've decided to implement the microservice architecture because it offers better scalability and maintainability.",
            output: FactBatch::new(vec![
                Fact::new(FactType::Decision, "Implement microservice architecture")
                    .with_metadata("alternatives", "three options")
                    .with_metadata("rationale", "better scalability and maintainability")
                    .with_confidence(0.98),
            ]),
        },
        FewShotExample {
            input: "The weather is nice today.",
            output: FactBatch::empty(),
        },
    ]
}

/// Render a prompt template with the category list and few-shot examples.
pub fn render_prompt(template: &str) -> Result<String> {
    let categories: Vec<CategoryContext> = FactType::ALL
        .iter()
        .map(|fact_type| CategoryContext {
            name: fact_type.as_str(),
            description: fact_type.description(),
        })
        .collect();

    let examples = few_shot_examples()
        .into_iter()
        .map(|example| -> Result<ExampleContext> {
            Ok(ExampleContext {
                input: example.input,
                output: example
                    .output
                    .to_json()
                    .context("failed to serialize few-shot example")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut environment = minijinja::Environment::new();
    environment
        .add_template("fact_extraction", template)
        .context("failed to compile extraction prompt template")?;
    let rendered = environment
        .get_template("fact_extraction")
        .context("extraction prompt template missing")?
        .render(minijinja::context! {
            categories => categories,
            examples => examples,
        })
        .context("failed to render extraction prompt")?;

    Ok(rendered)
}

/// Render the built-in extraction prompt.
pub fn default_prompt() -> Result<String> {
    render_prompt(BUILTIN_TEMPLATE)
}

/// Load the extraction prompt with fallback chain:
/// 1. Explicit path from config (must exist)
/// 2. `<instance_dir>/prompts/FACT_EXTRACTION.md`
/// 3. Built-in template
pub async fn load_prompt(explicit: Option<&Path>, instance_dir: &Path) -> Result<String> {
    if let Some(path) = explicit {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read custom prompt: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "using custom extraction prompt");
        return render_prompt(&template);
    }

    let shared_path = override_path(instance_dir);
    if shared_path.exists() {
        let template = tokio::fs::read_to_string(&shared_path)
            .await
            .with_context(|| format!("failed to read prompt override: {}", shared_path.display()))?;
        tracing::debug!(path = %shared_path.display(), "using instance extraction prompt");
        return render_prompt(&template);
    }

    default_prompt()
}

fn override_path(instance_dir: &Path) -> PathBuf {
    instance_dir.join("prompts").join(PROMPT_OVERRIDE_FILE)
}

/// JSON Schema of the `{"facts": [...]}` payload.
pub fn fact_batch_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(FactBatch);
    serde_json::to_value(schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::parse::parse_fact_batch;

    #[test]
    fn default_prompt_lists_every_category_in_order() {
        let prompt = default_prompt().unwrap();
        let mut last = 0;
        for (position, fact_type) in FactType::ALL.iter().enumerate() {
            let line = format!("{}. {}: ", position + 1, fact_type.as_str());
            let found = prompt
                .find(&line)
                .unwrap_or_else(|| panic!("missing category line `{line}`"));
            assert!(found >= last);
            last = found;
        }
    }

    #[test]
    fn every_prompt_example_satisfies_the_parser() {
        let prompt = default_prompt().unwrap();
        let outputs: Vec<&str> = prompt
            .lines()
            .filter_map(|line| line.trim().strip_prefix("Output: "))
            .collect();

        assert_eq!(outputs.len(), few_shot_examples().len());
        for output in outputs {
            parse_fact_batch(output).unwrap_or_else(|error| panic!("{output}: {error}"));
        }
    }

    #[test]
    fn prompt_includes_empty_result_example() {
        let prompt = default_prompt().unwrap();
        assert!(prompt.contains("Input: The weather is nice today."));
        assert!(prompt.contains(r#"Output: {"facts":[]}"#));
    }

    #[test]
    fn custom_templates_share_the_render_context() {
        let rendered =
            render_prompt("Types: {% for c in categories %}{{ c.name }} {% endfor %}").unwrap();
        assert_eq!(
            rendered.trim(),
            "Types: DECISION ISSUE ACTION CLIENT_CONTEXT PROJECT_CONTEXT REFERENCE LEARNING"
        );
    }

    #[test]
    fn broken_template_is_an_error() {
        assert!(render_prompt("{% for c in categories %}").is_err());
    }

    #[tokio::test]
    async fn load_prompt_prefers_explicit_then_instance_override() {
        let temp_dir = tempfile::tempdir().expect("temp dir should be created");
        let instance_dir = temp_dir.path();

        let builtin = load_prompt(None, instance_dir).await.unwrap();
        assert_eq!(builtin, default_prompt().unwrap());

        let prompts_dir = instance_dir.join("prompts");
        tokio::fs::create_dir_all(&prompts_dir).await.unwrap();
        tokio::fs::write(prompts_dir.join(PROMPT_OVERRIDE_FILE), "instance prompt")
            .await
            .unwrap();
        assert_eq!(load_prompt(None, instance_dir).await.unwrap(), "instance prompt");

        let explicit = instance_dir.join("custom.md");
        tokio::fs::write(&explicit, "explicit prompt").await.unwrap();
        assert_eq!(
            load_prompt(Some(&explicit), instance_dir).await.unwrap(),
            "explicit prompt"
        );
    }

    #[tokio::test]
    async fn missing_explicit_prompt_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("temp dir should be created");
        let missing = temp_dir.path().join("nope.md");
        assert!(load_prompt(Some(&missing), temp_dir.path()).await.is_err());
    }

    #[test]
    fn schema_describes_facts_array() {
        let schema = fact_batch_schema();
        assert_eq!(schema["properties"]["facts"]["type"], "array");
        assert!(
            schema["required"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("facts"))
        );
    }
}
