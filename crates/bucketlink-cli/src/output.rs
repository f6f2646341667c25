//! CLI output rendering
//!
//! One [`Printer`] per invocation, carrying the selected format and the
//! quiet flag. Human output goes line by line; JSON output emits one
//! document per result. Diagnostics always go to stderr so JSON stdout
//! stays parseable.

use bucketlink_core::domain::SyncPlan;
use bucketlink_sync::report::SyncReport;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Formats results for the terminal
pub struct Printer {
    format: OutputFormat,
    quiet: bool,
}

impl Printer {
    #[must_use]
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Final result line; printed even under --quiet.
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("\u{2713} {message}"),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({"success": true, "message": message})
            ),
        }
    }

    /// Supporting detail; suppressed under --quiet and in JSON mode.
    pub fn info(&self, message: &str) {
        if !self.quiet && self.format == OutputFormat::Human {
            println!("  {message}");
        }
    }

    pub fn warn(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\u{26a0} Warning: {message}"),
            OutputFormat::Json => eprintln!(
                "{}",
                serde_json::json!({"level": "warning", "message": message})
            ),
        }
    }

    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\u{2717} Error: {message}"),
            OutputFormat::Json => eprintln!(
                "{}",
                serde_json::json!({"success": false, "error": message})
            ),
        }
    }

    pub fn json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

/// Render a dry-run plan.
pub fn render_plan(printer: &Printer, plan: &SyncPlan) {
    if printer.is_json() {
        if let Ok(value) = serde_json::to_value(plan) {
            printer.json(&value);
        }
        return;
    }

    for step in &plan.steps {
        for action in &step.actions {
            if !action.is_keep() {
                printer.info(&action.to_string());
            }
        }
    }
    printer.success(&format!(
        "{} ({}) dry run: {} key(s), {} change(s)",
        plan.direction,
        plan.mode,
        plan.len(),
        plan.mutation_count()
    ));
}

/// Render a completed run's report, including any per-key failures.
pub fn render_report(printer: &Printer, report: &SyncReport) {
    if printer.is_json() {
        if let Ok(value) = serde_json::to_value(report) {
            printer.json(&value);
        }
    }

    for failure in &report.failures {
        printer.warn(&format!("{}: {}", failure.action, failure.error));
    }

    if !printer.is_json() {
        printer.info(&format!("run {} took {} ms", report.run_id, report.duration_ms()));
        if report.is_clean() {
            printer.success(&report.to_string());
        } else {
            printer.error(&report.to_string());
        }
    }
}
