use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.email.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

/// Commit metadata as read from history, before its volume is measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMeta {
    pub id: String,
    pub author: Identity,
    pub committer: Identity,
    pub authored_at: Option<DateTime<FixedOffset>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub meta: CommitMeta,
    pub volume: u64,
}

impl Commit {
    pub fn new(meta: CommitMeta, volume: u64) -> Self {
        Self { meta, volume }
    }

    pub fn short_id(&self) -> &str {
        short_id(&self.meta.id)
    }

    pub fn identities(&self) -> [&str; 4] {
        [
            &self.meta.author.name,
            &self.meta.author.email,
            &self.meta.committer.name,
            &self.meta.committer.email,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    #[serde(rename = "AI")]
    Ai,
    Human,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::Human => "Human",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SHORT_ID_LEN: usize = 7;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}
