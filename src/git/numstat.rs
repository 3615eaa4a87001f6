use crate::types::config::VolumeMetric;
use tracing::debug;

/// One `git --numstat` line. Binary files report `None` for both counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub added: Option<u64>,
    pub deleted: Option<u64>,
    pub path: String,
}

pub fn parse(stdout: &str) -> Vec<FileStat> {
    stdout.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<FileStat> {
    let mut parts = line.splitn(3, '\t');
    let added = parts.next()?;
    let deleted = parts.next()?;
    let path = parts.next()?;
    Some(FileStat {
        added: added.trim().parse().ok(),
        deleted: deleted.trim().parse().ok(),
        path: path.to_string(),
    })
}

pub fn volume(stats: &[FileStat], metric: VolumeMetric) -> u64 {
    stats
        .iter()
        .map(|stat| {
            if stat.added.is_none() && stat.deleted.is_none() {
                debug!(path = %stat.path, "binary file counted as zero");
            }
            let added = stat.added.unwrap_or(0);
            match metric {
                VolumeMetric::AddedDeleted => added + stat.deleted.unwrap_or(0),
                VolumeMetric::Added => added,
            }
        })
        .sum()
}
