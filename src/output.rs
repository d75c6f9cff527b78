use eyre::Result;

use crate::Report;

/// Render a report as plain text: title, a blank line, then the summary verbatim
pub fn render_text(report: &Report) -> String {
    format!("{}\n\n{}", report.metadata.title, report.summary)
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
