use crate::error::{AttributionError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub base: Option<GitRef>,
    #[serde(default)]
    pub head: Option<GitRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    pub sha: Option<String>,
    #[serde(rename = "ref")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: Option<String>,
}

impl PullRequest {
    pub fn base_sha(&self) -> Option<&str> {
        self.base.as_ref().and_then(|base| base.sha.as_deref())
    }

    pub fn head_sha(&self) -> Option<&str> {
        self.head.as_ref().and_then(|head| head.sha.as_deref())
    }

    pub fn base_ref(&self) -> Option<&str> {
        self.base.as_ref().and_then(|base| base.name.as_deref())
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

impl EventPayload {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| AttributionError::EventPayload(e.to_string()))
    }

    pub fn repository_name(&self) -> Option<&str> {
        self.repository
            .as_ref()
            .and_then(|repository| repository.full_name.as_deref())
    }

    pub fn into_pull_request(self) -> Result<PullRequest> {
        self.pull_request.ok_or(AttributionError::MissingPullRequest)
    }
}

pub fn load_event(path: &Path) -> Result<EventPayload> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AttributionError::EventPayload(format!("{}: {}", path.display(), e))
    })?;
    EventPayload::parse(&content)
}
