//! Pull command - overwrite the local tree with the bucket
//!
//! The mirror of `push`: safe mode renames superseded local files to
//! revision names, `--unsafe` prunes local files absent from the bucket.

use anyhow::Result;
use clap::Args;

use bucketlink_core::domain::policy::{ConflictMode, Direction};
use bucketlink_sync::SyncError;

use crate::commands::{build_engine, load_config};
use crate::output::{render_plan, render_report, Printer};
use crate::CliOptions;

#[derive(Debug, Args)]
pub struct PullCommand {
    /// Discard superseded local files instead of renaming them
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Create the local root directory if it does not exist
    #[arg(long)]
    pub create_root: bool,
}

impl PullCommand {
    pub async fn execute(&self, opts: &CliOptions) -> Result<()> {
        let printer = Printer::new(opts.format, opts.quiet);
        let config = load_config(opts)?;
        let engine = build_engine(&config, false, self.create_root).await?;
        let safe = !self.unsafe_mode;

        if self.dry_run {
            let plan = engine
                .plan(Direction::Pull, ConflictMode::from_safe_flag(safe))
                .await?;
            render_plan(&printer, &plan);
            return Ok(());
        }

        match engine.pull(safe).await {
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
