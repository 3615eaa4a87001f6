pub mod numstat;
pub mod range;

use crate::error::{AttributionError, Result};
use crate::types::commit::{CommitMeta, Identity};
use chrono::DateTime;
use numstat::FileStat;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Everything the attribution run needs from version control.
pub trait HistoryProvider {
    /// True when `rev` names a commit object present locally.
    fn has_commit(&self, rev: &str) -> bool;

    /// Fetches `rev` from the default remote.
    fn fetch(&self, rev: &str) -> Result<()>;

    /// Resolves `rev` to a full commit hash.
    fn resolve(&self, rev: &str) -> Result<String>;

    /// Commits reachable from `head` but not from `base`, in the order git
    /// lists them.
    fn list_range(&self, base: &str, head: &str) -> Result<Vec<String>>;

    fn commit_meta(&self, id: &str) -> Result<CommitMeta>;

    fn numstat(&self, id: &str) -> Result<Vec<FileStat>>;
}

/// Shells out to the `git` binary inside a working tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    remote: String,
}

const META_FORMAT: &str = "--format=%H%x00%an%x00%ae%x00%cn%x00%ce%x00%aI";

impl GitCli {
    pub fn open(root: &Path) -> Result<Self> {
        let cli = Self {
            root: root.to_path_buf(),
            remote: "origin".to_string(),
        };
        let output = cli.git(&["rev-parse", "--git-dir"])?;
        if !output.status.success() {
            return Err(AttributionError::NotGitRepo(root.display().to_string()));
        }
        Ok(cli)
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(AttributionError::Io)
    }

    fn git_stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Err(AttributionError::GitCommand {
                command: args.join(" "),
                reason: stderr_reason(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl HistoryProvider for GitCli {
    fn has_commit(&self, rev: &str) -> bool {
        let object = format!("{rev}^{{commit}}");
        self.git(&["cat-file", "-e", &object])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn fetch(&self, rev: &str) -> Result<()> {
        self.git_stdout(&["fetch", "--no-tags", "--quiet", &self.remote, rev])
            .map(|_| ())
    }

    fn resolve(&self, rev: &str) -> Result<String> {
        let object = format!("{rev}^{{commit}}");
        let output = self.git(&["rev-parse", "--verify", "--quiet", &object])?;
        if !output.status.success() {
            return Err(AttributionError::UnresolvedRevision {
                rev: rev.to_string(),
                reason: "not found in local history".to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn list_range(&self, base: &str, head: &str) -> Result<Vec<String>> {
        let range = format!("{base}..{head}");
        // merge commits only replay lines already counted on their parents
        let output = self.git(&["rev-list", "--no-merges", &range])?;
        if !output.status.success() {
            return Err(AttributionError::RangeQuery {
                range,
                reason: stderr_reason(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn commit_meta(&self, id: &str) -> Result<CommitMeta> {
        let header = self.git_stdout(&["show", "-s", META_FORMAT, id])?;
        let message = self.git_stdout(&["log", "-1", "--format=%B", id])?;
        parse_meta(&header, message.trim_end())
    }

    fn numstat(&self, id: &str) -> Result<Vec<FileStat>> {
        let stdout = self.git_stdout(&["show", "--numstat", "--format=", id])?;
        Ok(numstat::parse(&stdout))
    }
}

fn stderr_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("exit status {}", output.status)
    } else {
        stderr
    }
}

fn parse_meta(header: &str, message: &str) -> Result<CommitMeta> {
    let fields: Vec<&str> = header.trim_end_matches(['\n', '\r']).split('\0').collect();
    let [id, author_name, author_email, committer_name, committer_email, authored] =
        fields.as_slice()
    else {
        return Err(AttributionError::GitCommand {
            command: "show -s".to_string(),
            reason: format!("unexpected commit header with {} fields", fields.len()),
        });
    };

    Ok(CommitMeta {
        id: id.to_string(),
        author: Identity::new(*author_name, *author_email),
        committer: Identity::new(*committer_name, *committer_email),
        authored_at: DateTime::parse_from_rfc3339(authored).ok(),
        message: message.to_string(),
    })
}
