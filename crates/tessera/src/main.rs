//! Tessera CLI - structured content renderer.
//!
//! Provides commands for:
//! - `render`: Render a content document to HTML
//! - `validate`: Check anchor ids before saving
//! - `anchors`: Assign missing anchor ids
//! - `retitle`: Change a node title and regenerate its anchor

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AnchorsArgs, RenderArgs, RetitleArgs, ValidateArgs};
use error::CliError;
use output::Output;

/// Tessera - structured content renderer.
#[derive(Parser)]
#[command(name = "tessera", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover tessera.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document to HTML.
    Render(RenderArgs),
    /// Validate anchor ids (format and uniqueness).
    Validate(ValidateArgs),
    /// Assign anchor ids to titled nodes that lack one.
    Anchors(AnchorsArgs),
    /// Change a node's title and regenerate its anchor.
    Retitle(RetitleArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Render(args) => args.execute(config),
        Commands::Validate(args) => args.execute(config),
        Commands::Anchors(args) => args.execute(config),
        Commands::Retitle(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(config))),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
