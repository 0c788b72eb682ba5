//! jsxdown CLI - compile annotated markdown into React components.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "jsxdown")]
#[command(about = "Compile annotated markdown into React components")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to jsxdown.toml config file
    #[arg(short, long, default_value = "jsxdown.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a markdown file or directory into component source
    Build {
        /// Markdown file or directory of markdown files
        input: PathBuf,

        /// Output file (stdout when omitted) or directory (defaults to "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the parsed document as JSON
    Parse {
        /// Markdown file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for generated output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Build { input, output } => {
            commands::build::run(config, input, output).await?;
        }
        Commands::Parse { input } => {
            commands::parse::run(config, input).await?;
        }
    }

    Ok(())
}
