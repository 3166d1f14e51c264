//! knoco command line.

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use knoco::config::Config;
use knoco::llm::OpenAiBackend;
use knoco::memory::{self, FactBatch, FactExtractor, KeywordExtractor, LlmFactExtractor};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "knoco", version, about = "Consultant memory fact extraction")]
struct Cli {
    /// Path to config.toml. Defaults to $KNOCO_DIR/config.toml, then environment variables.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract facts from text (argument or stdin).
    Extract {
        /// Text to extract from. Reads stdin when omitted.
        text: Option<String>,

        /// Use the offline keyword extractor instead of the LLM.
        #[arg(long)]
        offline: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the rendered extraction prompt.
    Prompt,
    /// Print the JSON Schema of the extraction output.
    Schema,
    /// Print the resolved configuration with secrets redacted.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// `{"facts": [...]}`
    Json,
    /// One `TYPE: content` line per fact.
    Text,
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    Ok(config)
}

async fn build_extractor(config: &Config) -> anyhow::Result<LlmFactExtractor> {
    let backend = OpenAiBackend::new(&config.llm)?;
    let system_prompt = memory::load_prompt(
        config.extraction.custom_prompt_path.as_deref(),
        &config.instance_dir,
    )
    .await?;
    Ok(LlmFactExtractor::new(Arc::new(backend), system_prompt))
}

/// The argument when given, otherwise everything on `stdin`.
fn read_input(text: Option<String>, mut stdin: impl Read) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            stdin
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn render_batch(batch: &FactBatch, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(batch)?,
        OutputFormat::Text => batch
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(rendered)
}

fn print_batch(batch: &FactBatch, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_batch(batch, format)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Extract {
            text,
            offline,
            format,
        } => {
            let input = read_input(text, std::io::stdin().lock())?;
            let batch = if offline {
                KeywordExtractor::new().extract(&input).await?
            } else {
                let config = load_config(cli.config.as_ref())?;
                tracing::info!(
                    model = %config.llm.model,
                    version = %config.extraction.version,
                    "extracting facts"
                );
                build_extractor(&config).await?.extract(&input).await?
            };
            print_batch(&batch, format)?;
        }
        Command::Prompt => {
            let config = load_config(cli.config.as_ref())?;
            let prompt = memory::load_prompt(
                config.extraction.custom_prompt_path.as_deref(),
                &config.instance_dir,
            )
            .await?;
            println!("{prompt}");
        }
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&memory::fact_batch_schema())?
            );
        }
        Command::Config => {
            let config = load_config(cli.config.as_ref())?;
            println!("{config:#?}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use knoco::memory::{Fact, FactType};

    fn sample_batch() -> FactBatch {
        FactBatch::new(vec![
            Fact::new(FactType::Decision, "Use AWS over Azure for cloud infrastructure.")
                .with_confidence(0.6),
            Fact::new(FactType::Action, "Schedule a meeting with the finance team."),
        ])
    }

    #[test]
    fn text_format_prints_one_prefixed_line_per_fact() {
        let rendered = render_batch(&sample_batch(), OutputFormat::Text).unwrap();
        assert_eq!(
            rendered,
            "DECISION: Use AWS over Azure for cloud infrastructure.\n\
             ACTION: Schedule a meeting with the finance team."
        );
        assert_eq!(render_batch(&FactBatch::empty(), OutputFormat::Text).unwrap(), "");
    }

    #[test]
    fn json_format_is_the_facts_envelope() {
        let rendered = render_batch(&sample_batch(), OutputFormat::Json).unwrap();
        let parsed = memory::parse_fact_batch(&rendered).unwrap();
        assert_eq!(parsed, sample_batch());

        let empty = render_batch(&FactBatch::empty(), OutputFormat::Json).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&empty).unwrap(),
            serde_json::json!({"facts": []})
        );
    }

    #[test]
    fn input_prefers_argument_over_stdin() {
        let stdin = "from stdin".as_bytes();
        assert_eq!(
            read_input(Some("from argument".into()), stdin).unwrap(),
            "from argument"
        );
        assert_eq!(read_input(None, stdin).unwrap(), "from stdin");
    }
}
