//! Status command - show how local and remote currently differ
//!
//! Classifies every key without touching either side: in sync, changed,
//! local only, or remote only.

use anyhow::Result;
use clap::Args;

use bucketlink_core::domain::record::Relation;

use crate::commands::{build_engine, load_config};
use crate::output::Printer;
use crate::CliOptions;

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Also list keys that are already in sync
    #[arg(long)]
    pub all: bool,
}

impl StatusCommand {
    pub async fn execute(&self, opts: &CliOptions) -> Result<()> {
        let printer = Printer::new(opts.format, opts.quiet);
        let config = load_config(opts)?;
        let engine = build_engine(&config, false, false).await?;

        let classified = engine.classify().await?;

        let mut in_sync = 0usize;
        let mut changed = 0usize;
        let mut local_only = 0usize;
        let mut remote_only = 0usize;
        for (_, relation) in &classified {
            match relation {
                Relation::Matching => in_sync += 1,
                Relation::HatchMismatch => changed += 1,
                Relation::LocalOnly => local_only += 1,
                Relation::RemoteOnly => remote_only += 1,
            }
        }

        if printer.is_json() {
            let entries: Vec<serde_json::Value> = classified
                .iter()
                .map(|(key, relation)| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "relation": relation,
                    })
                })
                .collect();
            printer.json(&serde_json::json!({
                "bucket": config.bucket.name,
                "root": config.sync.root,
                "in_sync": in_sync,
                "changed": changed,
                "local_only": local_only,
                "remote_only": remote_only,
                "entries": entries,
            }));
            return Ok(());
        }

        for (key, relation) in &classified {
            if *relation == Relation::Matching && !self.all {
                continue;
            }
            printer.info(&format!("{relation:<12} {key}"));
        }

        printer.success(&format!(
            "{in_sync} in sync, {changed} changed, {local_only} local only, {remote_only} remote only"
        ));
        Ok(())
    }
}
