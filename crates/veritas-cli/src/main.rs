//! veritas CLI: check a Georgian text for disinformation against open sources.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use veritas_core::SubmittedText;
use veritas_runtime::{required_credentials, ProviderRegistry, VerificationPipeline, VeritasConfig};

/// Evidence-grounded disinformation checker
#[derive(Parser, Debug)]
#[command(name = "veritas", version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a text (argument, --file, or stdin)
    Check {
        /// Text to check
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and which API keys are set
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = VeritasConfig::load(cli.config.as_deref()).context("Configuration error")?;
    let registry = ProviderRegistry::with_defaults();

    match cli.command {
        Commands::Check { text, file, json } => {
            check(&config, &registry, text, file.as_deref(), json).await
        }
        Commands::Config => show_config(&config, &registry),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}

async fn check(
    config: &VeritasConfig,
    registry: &ProviderRegistry,
    text: Option<String>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    // Keys are checked before any input is read
    let credentials = required_credentials(config, registry)?
        .build_from_env()
        .context("Startup failed")?;
    let pipeline = VerificationPipeline::from_config(config, &credentials, registry)
        .context("Startup failed")?;

    let raw = read_input(text, file)?;
    let submitted = SubmittedText::parse(raw, config.input.max_chars)?;

    let report = pipeline.verify(submitted.as_str()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }

    Ok(())
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

fn show_config(config: &VeritasConfig, registry: &ProviderRegistry) -> Result<()> {
    print!("{}", config.to_yaml()?);

    println!();
    println!("# API keys");
    for var in required_credentials(config, registry)?.required_vars() {
        let status = match std::env::var(var) {
            Ok(value) if !value.is_empty() => "set",
            _ => "missing",
        };
        println!("# {var}: {status}");
    }

    println!();
    println!("# LLM providers");
    for name in registry.available_types() {
        if let Ok(factory) = registry.factory(name) {
            println!("# {name}: {}", factory.description());
        }
    }

    Ok(())
}
