use bucketsync_core::domain::SyncReport;

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    /// End-of-run summary
    fn report(&self, report: &SyncReport, dry_run: bool);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn report(&self, report: &SyncReport, dry_run: bool) {
        for line in summary_lines(report, dry_run) {
            match line {
                SummaryLine::Success(text) => println!("\u{2713} {}", text),
                SummaryLine::Info(text) => println!("  {}", text),
                SummaryLine::Warn(text) => self.warn(&text),
                SummaryLine::Error(text) => self.error(&text),
            }
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn report(&self, report: &SyncReport, dry_run: bool) {
        let mut value = serde_json::to_value(report).unwrap_or_default();
        if let Some(object) = value.as_object_mut() {
            object.insert("dry_run".into(), dry_run.into());
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

#[derive(Debug, PartialEq)]
enum SummaryLine {
    Success(String),
    Info(String),
    Warn(String),
    Error(String),
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn summary_lines(report: &SyncReport, dry_run: bool) -> Vec<SummaryLine> {
    let mut lines = Vec::new();
    let seconds = report.duration_ms as f64 / 1000.0;

    if report.cancelled {
        lines.push(SummaryLine::Warn(
            "Sync cancelled; remaining files were not processed".to_string(),
        ));
    }

    if dry_run {
        lines.push(SummaryLine::Success(format!(
            "Dry run: {} file{} would be uploaded ({:.1}s)",
            report.planned,
            plural(report.planned),
            seconds
        )));
    } else {
        lines.push(SummaryLine::Success(format!(
            "Uploaded {} file{} ({:.1}s)",
            report.uploaded,
            plural(report.uploaded),
            seconds
        )));
    }

    lines.push(SummaryLine::Info(format!(
        "Discovered: {}, skipped: {}",
        report.discovered, report.skipped
    )));
    if report.deleted > 0 || report.delete_failures > 0 {
        lines.push(SummaryLine::Info(format!(
            "Source files deleted: {}",
            report.deleted
        )));
    }

    if report.has_failures() {
        lines.push(SummaryLine::Warn(format!(
            "{} problem{} (open: {}, transfer: {}, delete: {}, walk: {})",
            report.failure_count(),
            plural(report.failure_count()),
            report.open_failures,
            report.transfer_failures,
            report.delete_failures,
            report.walk_errors
        )));
        for failure in &report.failures {
            lines.push(SummaryLine::Error(failure.clone()));
        }
        if report.failures_omitted > 0 {
            lines.push(SummaryLine::Info(format!(
                "... and {} more (see the log above)",
                report.failures_omitted
            )));
        }
    }

    lines
}
