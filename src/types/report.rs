use crate::types::commit::{short_id, Commit, Label};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttributionTotals {
    pub ai_volume: u64,
    pub human_volume: u64,
}

impl AttributionTotals {
    pub fn add(&mut self, label: Label, volume: u64) {
        match label {
            Label::Ai => self.ai_volume += volume,
            Label::Human => self.human_volume += volume,
        }
    }

    pub fn total_volume(&self) -> u64 {
        self.ai_volume + self.human_volume
    }

    /// `round(100 * ai / total)`, rounding halves up; 0 when nothing changed.
    pub fn computed_percent(&self) -> u8 {
        let total = u128::from(self.total_volume());
        if total == 0 {
            return 0;
        }
        let ai = u128::from(self.ai_volume);
        ((200 * ai + total) / (2 * total)) as u8
    }
}

/// One row of the rendered commit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitDetail {
    pub id: String,
    pub author: String,
    pub date: Option<String>,
    pub volume: u64,
    pub label: Label,
}

impl CommitDetail {
    pub fn from_commit(commit: &Commit, label: Label) -> Self {
        Self {
            id: commit.short_id().to_string(),
            author: commit.meta.author.to_string(),
            date: commit
                .meta
                .authored_at
                .map(|at| at.format("%Y-%m-%d").to_string()),
            volume: commit.volume,
            label,
        }
    }
}

/// The computed half of a report: what history alone says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribution {
    pub base: String,
    pub head: String,
    pub totals: AttributionTotals,
    pub computed_percent: u8,
    pub commits: Vec<CommitDetail>,
}

impl Attribution {
    pub fn new(
        base: &str,
        head: &str,
        totals: AttributionTotals,
        commits: Vec<CommitDetail>,
    ) -> Self {
        Self {
            base: base.to_string(),
            head: head.to_string(),
            computed_percent: totals.computed_percent(),
            totals,
            commits,
        }
    }

    pub fn short_base(&self) -> &str {
        short_id(&self.base)
    }

    pub fn short_head(&self) -> &str {
        short_id(&self.head)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub attribution: Attribution,
    pub declared_percent: u8,
    pub final_percent: u8,
}

impl Report {
    pub fn new(attribution: Attribution, declared_percent: u8) -> Self {
        let final_percent = attribution.computed_percent.max(declared_percent);
        Self {
            attribution,
            declared_percent,
            final_percent,
        }
    }

    pub fn computed_percent(&self) -> u8 {
        self.attribution.computed_percent
    }
}
