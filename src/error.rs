use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("no Declared-AI-Percent field found in the pull request description")]
    Missing,

    #[error("Declared-AI-Percent value `{0}` is not an integer")]
    NotInteger(String),

    #[error("declared AI percent {0} is outside 0..=100")]
    OutOfRange(i64),
}

#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("missing required input: {0} is not set")]
    MissingEnv(&'static str),

    #[error("invalid event payload: {0}")]
    EventPayload(String),

    #[error("event payload has no pull_request object; run this on pull_request events")]
    MissingPullRequest,

    #[error("not a git repository: {0}")]
    NotGitRepo(String),

    #[error("cannot resolve revision {rev}: {reason}")]
    UnresolvedRevision { rev: String, reason: String },

    #[error("range query {range} failed: {reason}")]
    RangeQuery { range: String, reason: String },

    #[error("git {command} failed: {reason}")]
    GitCommand { command: String, reason: String },

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("pull request api error: {0}")]
    Api(String),

    #[error("{0}\nexpected a line such as `**Declared-AI-Percent**: 40` (integer 0-100)")]
    Declaration(#[from] DeclarationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AttributionError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Declaration(_) => crate::exit_code::DECLARATION_REJECTED,
            _ => crate::exit_code::RUNTIME_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, AttributionError>;
