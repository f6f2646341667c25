//! Push command - overwrite the bucket with the local tree
//!
//! Safe mode (the default) preserves superseded remote objects under
//! revision names. Destructive pruning requires the explicit `--unsafe`
//! flag; it is never inferred.

use anyhow::Result;
use clap::Args;

use bucketlink_core::domain::policy::{ConflictMode, Direction};
use bucketlink_sync::SyncError;

use crate::commands::{build_engine, load_config};
use crate::output::{render_plan, render_report, Printer};
use crate::CliOptions;

#[derive(Debug, Args)]
pub struct PushCommand {
    /// Discard superseded remote objects instead of renaming them
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Create the bucket if it does not exist
    #[arg(long)]
    pub create_bucket: bool,
}

impl PushCommand {
    pub async fn execute(&self, opts: &CliOptions) -> Result<()> {
        let printer = Printer::new(opts.format, opts.quiet);
        let config = load_config(opts)?;
        let engine = build_engine(&config, self.create_bucket, false).await?;
        let safe = !self.unsafe_mode;

        if self.dry_run {
            let plan = engine
                .plan(Direction::Push, ConflictMode::from_safe_flag(safe))
                .await?;
            render_plan(&printer, &plan);
            return Ok(());
        }

        match engine.push(safe).await {
            Ok(report) => {
                render_report(&printer, &report);
                Ok(())
            }
            Err(SyncError::Partial { report }) => {
                render_report(&printer, &report);
                Err(SyncError::Partial { report }.into())
            }
            Err(other) => Err(other.into()),
        }
    }
}
