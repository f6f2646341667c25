//! bucketlink CLI - link a local directory to an S3 bucket
//!
//! Provides commands for:
//! - Pushing the local tree to the bucket
//! - Pulling the bucket into the local tree
//! - Showing the current diff without changing anything
//! - Inspecting configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use bucketlink_core::config::Config;
use commands::{
    completions::CompletionsCommand, config::ConfigCommand, pull::PullCommand, push::PushCommand,
    status::StatusCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "bucketlink", version, about = "Sync a local folder with an S3 bucket")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Overwrite the bucket with the local tree
    Push(PushCommand),
    /// Overwrite the local tree with the bucket
    Pull(PullCommand),
    /// Show how local and remote currently differ
    Status(StatusCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Global options threaded through every command.
pub struct CliOptions {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing: -v flags override the configured level.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let configured_level = Config::load_or_default(&config_path).logging.level;
    let filter = match cli.verbose {
        0 => configured_level,
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let opts = CliOptions {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
        quiet: cli.quiet,
        config: cli.config,
    };

    match cli.command {
        Commands::Push(cmd) => cmd.execute(&opts).await,
        Commands::Pull(cmd) => cmd.execute(&opts).await,
        Commands::Status(cmd) => cmd.execute(&opts).await,
        Commands::Config(cmd) => cmd.execute(&opts).await,
        Commands::Completions(cmd) => cmd.execute(&opts).await,
    }
}
