use crate::types::report::{Attribution, CommitDetail, Report};

/// First line of every rendered report, used to find and update an earlier
/// comment instead of posting a new one.
pub const REPORT_MARKER: &str = "<!-- pr-attribution-report -->";

pub fn to_markdown(report: &Report) -> String {
    let attribution = &report.attribution;
    let mut output = String::new();
    output.push_str(REPORT_MARKER);
    output.push('\n');
    output.push_str("## AI Attribution Report\n\n");
    output.push_str("| Metric | Value |\n|---|---:|\n");
    output.push_str(&format!(
        "| Computed AI % | {}% |\n",
        attribution.computed_percent
    ));
    output.push_str(&format!("| Declared AI % | {}% |\n", report.declared_percent));
    output.push_str(&format!("| **Final AI %** | **{}%** |\n", report.final_percent));
    push_volume_rows(&mut output, attribution);
    output.push('\n');
    output.push_str("Final = max(computed, declared).\n\n");
    push_commit_section(&mut output, attribution);
    output
}

/// Computed-only variant for local previews.
pub fn attribution_markdown(attribution: &Attribution) -> String {
    let mut output = String::new();
    output.push_str("## AI Attribution (computed)\n\n");
    output.push_str("| Metric | Value |\n|---|---:|\n");
    output.push_str(&format!(
        "| Computed AI % | {}% |\n",
        attribution.computed_percent
    ));
    push_volume_rows(&mut output, attribution);
    output.push('\n');
    push_commit_section(&mut output, attribution);
    output
}

fn push_volume_rows(output: &mut String, attribution: &Attribution) {
    let totals = &attribution.totals;
    output.push_str(&format!("| AI lines | {} |\n", totals.ai_volume));
    output.push_str(&format!("| Human lines | {} |\n", totals.human_volume));
    output.push_str(&format!("| Total lines | {} |\n", totals.total_volume()));
}

fn push_commit_section(output: &mut String, attribution: &Attribution) {
    output.push_str(&format!(
        "### Commits (`{}..{}`, {})\n\n",
        attribution.short_base(),
        attribution.short_head(),
        attribution.commits.len()
    ));
    output.push_str("| Commit | Author | Date | Lines | Label |\n");
    output.push_str("|---|---|---|---:|---|\n");
    for commit in &attribution.commits {
        output.push_str(&commit_row(commit));
    }
    if attribution.commits.is_empty() {
        output.push_str("\n_No commits in range._\n");
    }
}

fn commit_row(commit: &CommitDetail) -> String {
    format!(
        "| `{}` | {} | {} | {} | {} |\n",
        commit.id,
        escape_cell(&commit.author),
        commit.date.as_deref().unwrap_or("-"),
        commit.volume,
        commit.label
    )
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}
