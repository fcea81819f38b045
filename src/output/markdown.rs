//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a run: run metadata,
//! the statistics table, and one row per processed domain.

use crate::output::traits::{OutputResult, RunSummary};
use crate::output::NOT_VALIDATED;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let stats = &summary.statistics;
    let mut md = String::new();

    md.push_str("# Address-Scout Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", summary.run_id));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Statistics
    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count | Share |\n");
    md.push_str("|--------|-------|-------|\n");
    md.push_str(&format!("| Domains processed | {} | 100.0% |\n", stats.total));
    md.push_str(&format!(
        "| Reachable | {} | {:.1}% |\n",
        stats.reachable,
        stats.reachable_pct()
    ));
    md.push_str(&format!(
        "| Reachable - No Addresses | {} | {:.1}% |\n",
        stats.no_address,
        stats.no_address_pct()
    ));
    md.push_str(&format!(
        "| Unreachable | {} | {:.1}% |\n",
        stats.unreachable,
        stats.unreachable_pct()
    ));
    md.push_str(&format!(
        "| Validated | {} | {:.1}% |\n",
        stats.validated,
        stats.validated_pct()
    ));
    if stats.truncated > 0 {
        md.push_str(&format!(
            "| Truncated by budget | {} | {:.1}% |\n",
            stats.truncated,
            stats.percentage(stats.truncated)
        ));
    }
    md.push('\n');

    // Per-domain results
    if !summary.results.is_empty() {
        md.push_str("## Domains\n\n");
        md.push_str("| # | Domain | Status | Candidates | Validated |\n");
        md.push_str("|---|--------|--------|------------|-----------|\n");

        for result in &summary.results {
            let validated = if result.is_validated() {
                result
                    .validated_addresses
                    .iter()
                    .map(|v| escape_cell(&v.canonical_text))
                    .collect::<Vec<_>>()
                    .join("<br>")
            } else {
                NOT_VALIDATED.to_string()
            };

            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                result.position + 1,
                escape_cell(&result.domain),
                result.status,
                result.address_candidates.len(),
                validated
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
