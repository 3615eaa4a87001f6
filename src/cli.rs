use crate::declaration::fetch::DEFAULT_API_URL;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pr-attribution",
    version,
    about = "AI vs human attribution for pull requests, computed in CI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the report for the current pull request event and write CI outputs
    Run(RunCommand),
    /// Preview the computed attribution for a local revision range
    Scan(ScanCommand),
    /// Parse and validate the declared AI percent from a PR description
    Declaration(DeclarationCommand),
}

#[derive(Args)]
pub struct RunCommand {
    /// Event payload written by the CI runner
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Append-only output file for step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository coordinates as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Target branch, used when the payload lacks a base SHA
    #[arg(long, env = "GITHUB_BASE_REF")]
    pub base_ref: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Extra identity patterns, one regex per line
    #[arg(long)]
    pub patterns_file: Option<PathBuf>,

    /// Never refetch the PR description from the API
    #[arg(long)]
    pub no_refetch: bool,
}

#[derive(Args)]
pub struct ScanCommand {
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Exclusive lower bound (defaults to HEAD~1)
    #[arg(long)]
    pub base: Option<String>,

    /// Inclusive upper bound (defaults to HEAD)
    #[arg(long)]
    pub head: Option<String>,

    #[arg(long)]
    pub patterns_file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct DeclarationCommand {
    /// File holding the PR description; stdin when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
