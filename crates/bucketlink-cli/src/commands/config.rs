//! Config command - view and validate bucketlink configuration

use anyhow::{Context, Result};
use clap::Subcommand;

use bucketlink_core::config::Config;

use crate::commands::load_config;
use crate::output::Printer;
use crate::CliOptions;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Print the configuration file path in use
    Path,
    /// Validate the configuration
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, opts: &CliOptions) -> Result<()> {
        let printer = Printer::new(opts.format, opts.quiet);
        match self {
            ConfigCommand::Show => {
                let config = load_config(opts)?;
                if printer.is_json() {
                    let value = serde_json::to_value(&config)
                        .context("serializing configuration to JSON")?;
                    printer.json(&value);
                } else {
                    let yaml = serde_yaml::to_string(&config)
                        .context("serializing configuration to YAML")?;
                    for line in yaml.lines() {
                        printer.info(line);
                    }
                    printer.success("configuration loaded");
                }
                Ok(())
            }
            ConfigCommand::Path => {
                let path = opts
                    .config
                    .clone()
                    .unwrap_or_else(Config::default_path);
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommand::Validate => {
                let config = load_config(opts)?;
                let mut problems = Vec::new();
                if let Err(e) = config.bucket_name() {
                    problems.push(e.to_string());
                }
                if let Err(e) = config.local_root() {
                    problems.push(e.to_string());
                }

                if problems.is_empty() {
                    printer.success("configuration is valid");
                    Ok(())
                } else {
                    for problem in &problems {
                        printer.error(problem);
                    }
                    anyhow::bail!("configuration has {} problem(s)", problems.len())
                }
            }
        }
    }
}
