//! Report formatting.

use dszip_engine::{ExportError, ExportReport};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a completed export.
pub fn format_report(report: &ExportReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Human => {
            let mut out = format!(
                "Zipfile {} for dataset {}\n  files:   {} written, {} skipped, {} excluded of {} candidates\n",
                report.path.display(),
                report.dataset_id,
                report.written,
                report.skipped.total(),
                report.excluded(),
                report.candidates,
            );
            match report.archive_size {
                Some(size) if report.size_persisted => out.push_str(&format!("  size:    {} bytes\n", size)),
                Some(size) => out.push_str(&format!("  size:    {} bytes (not recorded in catalog)\n", size)),
                None => out.push_str("  size:    unknown\n"),
            }
            if report.index_degraded {
                out.push_str("  warning: entity files could not be loaded; membership index was empty\n");
            }
            out
        }
    }
}

/// Format a fatal error.
pub fn format_error(err: &ExportError, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": err.to_string()
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}
