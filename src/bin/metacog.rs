#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use metacog::gateway::{ChatGateway, NoopUsageSink, ProviderGateway, StderrUsageSink};
use metacog::pipeline::{self, PipelineConfig};
use metacog::report;

#[derive(Parser)]
#[command(name = "metacog", version, about = "Meta-cognitive reasoning pipeline CLI")]
struct Cli {
    /// Input string or path to an input file
    #[arg(long)]
    input: String,

    /// Additional context string or path to a context file
    #[arg(long)]
    context: Option<String>,

    /// Model to drive the pipeline with
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    /// Maximum tokens per completion (provider default when omitted)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Write the full session record as JSON to this path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log per-call usage records to stderr as JSON lines
    #[arg(long)]
    usage_stderr: bool,
}

/// Resolve an argument that may be a file path or a literal string.
fn resolve_arg(value: &str) -> Result<String, std::io::Error> {
    if Path::new(value).is_file() {
        std::fs::read_to_string(value)
    } else {
        Ok(value.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let input_data = resolve_arg(&cli.input)?;
    let context = match &cli.context {
        Some(value) => resolve_arg(value)?,
        None => String::new(),
    };
    let full_input = pipeline::combine_input(&input_data, &context);

    let gateway: Arc<dyn ChatGateway> = if cli.usage_stderr {
        Arc::new(ProviderGateway::from_env(Arc::new(StderrUsageSink))?)
    } else {
        Arc::new(ProviderGateway::from_env(Arc::new(NoopUsageSink))?)
    };

    let cfg = PipelineConfig {
        model: cli.model,
        max_tokens: cli.max_tokens,
        ..PipelineConfig::default()
    };

    let result = pipeline::run_pipeline(gateway.as_ref(), &cfg, full_input).await?;

    if let Some(out) = &cli.out {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out, json)?;
        eprintln!("[metacog] session written to {}", out.display());
    }

    print!("{}", report::render_report(&result));

    Ok(())
}
