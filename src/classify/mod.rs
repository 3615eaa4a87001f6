pub mod patterns;

use crate::types::commit::{Commit, Label};
use crate::types::config::PatternsConfig;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Identity patterns, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl PatternSet {
    /// Defaults followed by `extra`, in order.
    pub fn new(extra: impl IntoIterator<Item = Regex>) -> Self {
        let mut patterns: Vec<Regex> = patterns::DEFAULT_PATTERNS
            .iter()
            .filter_map(|pattern| patterns::compile(pattern))
            .collect();
        patterns.extend(extra);
        Self { patterns }
    }

    /// Defaults, then `[patterns].extra`, then the pattern file
    /// (`.github/ai-patterns.txt` unless configured). A configured path is
    /// taken relative to `root` unless absolute.
    pub fn from_config(
        root: &Path,
        config: &PatternsConfig,
        file_override: Option<&Path>,
    ) -> Self {
        let mut extra: Vec<Regex> = config
            .extra
            .iter()
            .filter_map(|pattern| patterns::compile(pattern))
            .collect();

        let file = file_override.map(Path::to_path_buf).unwrap_or_else(|| {
            root.join(
                config
                    .file
                    .as_deref()
                    .unwrap_or(patterns::DEFAULT_PATTERN_FILE),
            )
        });
        extra.extend(patterns::load_pattern_file(&file));

        let set = Self::new(extra);
        debug!(count = set.pattern_count(), "identity patterns loaded");
        set
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn matches(&self, value: &str) -> bool {
        !value.is_empty() && self.patterns.iter().any(|pattern| pattern.is_match(value))
    }
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*ai[ \t]*:[ \t]*true[ \t\r]*$").expect("marker regex is valid")
    })
}

pub fn has_ai_marker(message: &str) -> bool {
    marker().is_match(message)
}

/// Marker line first, then identity patterns; everything else is human.
pub fn classify(commit: &Commit, patterns: &PatternSet) -> Label {
    let label = if has_ai_marker(&commit.meta.message) {
        Label::Ai
    } else if commit
        .identities()
        .iter()
        .any(|identity| patterns.matches(identity))
    {
        Label::Ai
    } else {
        Label::Human
    };
    debug!(commit = commit.short_id(), %label, volume = commit.volume, "classified commit");
    label
}
