use lcom_core::summary::Summary;

/// Format a scored batch as JSON.
pub fn format_report(summary: &Summary, compact: bool) -> String {
    if compact {
        serde_json::to_string(summary).expect("Summary should be serializable")
    } else {
        serde_json::to_string_pretty(summary).expect("Summary should be serializable")
    }
}
