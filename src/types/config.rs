use serde::Deserialize;

pub const DEFAULT_REPORT_KEY: &str = "report";
pub const DEFAULT_SUMMARY_KEY: &str = "summary";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributionConfig {
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub declaration: DeclarationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternsConfig {
    #[serde(default)]
    pub extra: Vec<String>,
    pub file: Option<String>,
}

/// How a commit's diff statistics become a single change volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeMetric {
    #[default]
    AddedDeleted,
    /// Legacy: counts insertions only, so rewrites and removals vanish.
    Added,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeConfig {
    #[serde(default)]
    pub metric: VolumeMetric,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationConfig {
    #[serde(default = "default_refetch")]
    pub refetch: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            refetch: default_refetch(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_refetch() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_key")]
    pub report_key: String,
    #[serde(default = "default_summary_key")]
    pub summary_key: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_key: default_report_key(),
            summary_key: default_summary_key(),
        }
    }
}

fn default_report_key() -> String {
    DEFAULT_REPORT_KEY.to_string()
}

fn default_summary_key() -> String {
    DEFAULT_SUMMARY_KEY.to_string()
}
