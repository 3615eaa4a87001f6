use crate::classify::{classify, PatternSet};
use crate::types::commit::{Commit, Label};
use crate::types::report::{AttributionTotals, CommitDetail};

pub fn totals(pairs: impl IntoIterator<Item = (Label, u64)>) -> AttributionTotals {
    pairs
        .into_iter()
        .fold(AttributionTotals::default(), |mut totals, (label, volume)| {
            totals.add(label, volume);
            totals
        })
}

/// Classifies each commit in range order and sums volumes per label.
pub fn attribute(
    commits: &[Commit],
    patterns: &PatternSet,
) -> (Vec<CommitDetail>, AttributionTotals) {
    let details: Vec<CommitDetail> = commits
        .iter()
        .map(|commit| CommitDetail::from_commit(commit, classify(commit, patterns)))
        .collect();
    let totals = totals(details.iter().map(|detail| (detail.label, detail.volume)));
    (details, totals)
}
