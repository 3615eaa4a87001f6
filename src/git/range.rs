use super::HistoryProvider;
use crate::error::Result;
use tracing::{debug, warn};

pub const FALLBACK_BASE: &str = "HEAD~1";
pub const DEFAULT_HEAD: &str = "HEAD";

/// Revision expressions naming the two ends of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPair {
    pub base: String,
    pub head: String,
}

/// Both ends resolved to full hashes, plus the commits between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub base: String,
    pub head: String,
    pub commits: Vec<String>,
}

/// Picks the base from the payload SHA, then `origin/<base_ref>`, then
/// the commit before HEAD. The head falls back to `HEAD`.
pub fn select_revisions(
    base_sha: Option<&str>,
    head_sha: Option<&str>,
    base_ref: Option<&str>,
) -> RevisionPair {
    let base = non_empty(base_sha)
        .map(str::to_string)
        .or_else(|| non_empty(base_ref).map(|name| format!("origin/{name}")))
        .unwrap_or_else(|| FALLBACK_BASE.to_string());
    let head = non_empty(head_sha)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_HEAD.to_string());

    RevisionPair { base, head }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn resolve_range(
    provider: &dyn HistoryProvider,
    revisions: &RevisionPair,
) -> Result<ResolvedRange> {
    if !provider.has_commit(&revisions.base) {
        let fetch_target = revisions
            .base
            .strip_prefix("origin/")
            .unwrap_or(&revisions.base);
        debug!(base = %revisions.base, "base not present locally, fetching");
        if let Err(err) = provider.fetch(fetch_target) {
            warn!(base = %revisions.base, error = %err, "prefetch of base revision failed");
        }
    }

    let base = provider.resolve(&revisions.base)?;
    let head = provider.resolve(&revisions.head)?;
    let commits = provider.list_range(&base, &head)?;
    debug!(%base, %head, count = commits.len(), "resolved commit range");

    Ok(ResolvedRange {
        base,
        head,
        commits,
    })
}
