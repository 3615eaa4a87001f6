use crate::error::{AttributionError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Something that can produce the current pull request description.
pub trait BodySource {
    fn fetch_body(&self) -> Result<String>;
}

/// `GET /repos/{owner}/{repo}/pulls/{number}` against the GitHub REST API.
#[derive(Debug, Clone)]
pub struct PullRequestApi {
    api_url: String,
    repository: String,
    number: u64,
    token: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct PullBody {
    body: Option<String>,
}

impl PullRequestApi {
    /// Returns `None` unless both a credential and `owner/name` coordinates
    /// are available.
    pub fn from_parts(
        api_url: &str,
        repository: Option<&str>,
        number: u64,
        token: Option<&str>,
        timeout: Duration,
    ) -> Option<Self> {
        let token = token.map(str::trim).filter(|token| !token.is_empty())?;
        let repository = repository.map(str::trim).filter(|r| is_owner_and_name(r))?;
        Some(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            number,
            token: token.to_string(),
            timeout,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/repos/{}/pulls/{}",
            self.api_url, self.repository, self.number
        )
    }
}

fn is_owner_and_name(repository: &str) -> bool {
    repository
        .split_once('/')
        .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty())
}

impl BodySource for PullRequestApi {
    fn fetch_body(&self) -> Result<String> {
        let url = self.url();
        debug!(%url, "refetching pull request body");
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .get(&url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", concat!("pr-attribution/", env!("CARGO_PKG_VERSION")))
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()
            .map_err(|err| AttributionError::Api(err.to_string()))?;
        let pull: PullBody = response
            .into_json()
            .map_err(|err| AttributionError::Api(err.to_string()))?;
        Ok(pull.body.unwrap_or_default())
    }
}
