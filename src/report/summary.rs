use crate::types::report::Report;

pub fn summary_line(report: &Report) -> String {
    format!(
        "AI attribution: computed {}%, declared {}%, final {}% ({}..{})",
        report.computed_percent(),
        report.declared_percent,
        report.final_percent,
        report.attribution.short_base(),
        report.attribution.short_head()
    )
}
