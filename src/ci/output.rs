use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Formats one `name=value` entry, switching to the heredoc form
/// `name<<DELIM` whenever the value spans lines.
pub fn format_entry(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }
    let delimiter = delimiter_for(value);
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Content-derived so it cannot be confused with a line of the value.
fn delimiter_for(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
    let mut delimiter = format!("ATTRIBUTION_EOF_{}", &hex[..16]);
    while value.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// Appends every entry with a single write so a partial pair is never left
/// behind.
pub fn append_outputs(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let buffer: String = entries
        .iter()
        .map(|(name, value)| format_entry(name, value))
        .collect();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buffer.as_bytes())?;
    file.flush()?;
    Ok(())
}
