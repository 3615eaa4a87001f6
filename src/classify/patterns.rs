use regex::{Regex, RegexBuilder};
use std::path::Path;
use tracing::warn;

pub const DEFAULT_PATTERN_FILE: &str = ".github/ai-patterns.txt";

/// Identity fragments used by coding assistants and bot accounts.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"copilot",
    r"\[bot\]",
    r"[-_.]bot\b",
    r"claude-code",
    r"noreply@anthropic\.com",
    r"openai",
    r"chatgpt",
    r"\bcodex\b",
    r"cursoragent",
    r"devin-ai",
    r"\baider\b",
    r"gemini-code-assist",
    r"amazon-q",
];

pub fn compile(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| warn!(pattern, error = %err, "skipping invalid identity pattern"))
        .ok()
}

/// One regex per line; blank lines and `#` comments are skipped.
pub fn parse_pattern_lines(content: &str) -> Vec<Regex> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(compile)
        .collect()
}

/// A missing or unreadable file contributes no patterns.
pub fn load_pattern_file(path: &Path) -> Vec<Regex> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_pattern_lines(&content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot read pattern file");
            Vec::new()
        }
    }
}
