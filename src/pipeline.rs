use crate::aggregate;
use crate::ci::{event, output};
use crate::classify::PatternSet;
use crate::cli::{RunCommand, ScanCommand};
use crate::config;
use crate::declaration::fetch::{BodySource, PullRequestApi};
use crate::declaration::resolve_declared;
use crate::error::{AttributionError, Result};
use crate::git::range::{resolve_range, select_revisions, RevisionPair};
use crate::git::{numstat, GitCli, HistoryProvider};
use crate::report::{self, md, summary};
use crate::types::commit::Commit;
use crate::types::config::{AttributionConfig, VolumeMetric};
use crate::types::report::{Attribution, Report};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reads metadata and measures volume for each commit, in range order.
pub fn collect_commits(
    provider: &dyn HistoryProvider,
    ids: &[String],
    metric: VolumeMetric,
) -> Result<Vec<Commit>> {
    ids.iter()
        .map(|id| -> Result<Commit> {
            let meta = provider.commit_meta(id)?;
            let stats = provider.numstat(id)?;
            Ok(Commit::new(meta, numstat::volume(&stats, metric)))
        })
        .collect()
}

pub fn compute_attribution(
    provider: &dyn HistoryProvider,
    revisions: &RevisionPair,
    patterns: &PatternSet,
    metric: VolumeMetric,
) -> Result<Attribution> {
    let range = resolve_range(provider, revisions)?;
    let commits = collect_commits(provider, &range.commits, metric)?;
    let (details, totals) = aggregate::attribute(&commits, patterns);
    Ok(Attribution::new(&range.base, &range.head, totals, details))
}

/// The whole computation: history first, then the declaration gate.
pub fn build_report(
    provider: &dyn HistoryProvider,
    revisions: &RevisionPair,
    patterns: &PatternSet,
    metric: VolumeMetric,
    body: &str,
    refetch: Option<&dyn BodySource>,
) -> Result<Report> {
    let attribution = compute_attribution(provider, revisions, patterns, metric)?;
    let declared = resolve_declared(body, refetch)?;
    Ok(Report::new(attribution, declared))
}

fn warn_on_legacy_metric(config: &AttributionConfig) {
    if config.volume.metric == VolumeMetric::Added {
        warn!("volume.metric = \"added\" is deprecated; deletions are not counted");
    }
}

/// `--repository`/`GITHUB_REPOSITORY`, else the payload's `repository.full_name`.
fn repository_coordinates(cmd: &RunCommand, payload: &event::EventPayload) -> Option<String> {
    cmd.repository
        .clone()
        .or_else(|| payload.repository_name().map(str::to_string))
}

/// The API used to refetch the description, unless refetching is switched
/// off or the token or coordinates are missing.
fn refetch_source(
    cmd: &RunCommand,
    config: &AttributionConfig,
    repository: Option<&str>,
    number: u64,
) -> Option<PullRequestApi> {
    if cmd.no_refetch || !config.declaration.refetch {
        debug!("pull request body refetch disabled");
        return None;
    }
    PullRequestApi::from_parts(
        &cmd.api_url,
        repository,
        number,
        cmd.token.as_deref(),
        Duration::from_secs(config.declaration.timeout_secs),
    )
}

/// CI entry point. Returns the summary line; outputs are appended only once
/// the report has been fully built.
pub fn execute_run(cmd: &RunCommand) -> Result<String> {
    let event_path = cmd
        .event_path
        .as_deref()
        .ok_or(AttributionError::MissingEnv("GITHUB_EVENT_PATH"))?;
    let output_path = cmd
        .output
        .as_deref()
        .ok_or(AttributionError::MissingEnv("GITHUB_OUTPUT"))?;

    let payload = event::load_event(event_path)?;
    let repository = repository_coordinates(cmd, &payload);
    let pull = payload.into_pull_request()?;

    let git = GitCli::open(&cmd.repo)?;
    let config = config::load_config(&cmd.repo)?;
    warn_on_legacy_metric(&config);
    let patterns =
        PatternSet::from_config(&cmd.repo, &config.patterns, cmd.patterns_file.as_deref());

    let base_ref = cmd.base_ref.as_deref().or(pull.base_ref());
    let revisions = select_revisions(pull.base_sha(), pull.head_sha(), base_ref);
    info!(
        base = %revisions.base,
        head = %revisions.head,
        pr = pull.number,
        "computing attribution"
    );

    let api = refetch_source(cmd, &config, repository.as_deref(), pull.number);

    let report = build_report(
        &git,
        &revisions,
        &patterns,
        config.volume.metric,
        pull.body(),
        api.as_ref().map(|api| api as &dyn BodySource),
    )?;

    let markdown = md::to_markdown(&report);
    let summary = summary::summary_line(&report);
    output::append_outputs(
        output_path,
        &[
            (config.output.report_key.as_str(), markdown.as_str()),
            (config.output.summary_key.as_str(), summary.as_str()),
        ],
    )?;
    info!(final_percent = report.final_percent, "attribution outputs written");
    Ok(summary)
}

/// Local preview of the computed attribution; never touches CI outputs.
pub fn execute_scan(cmd: &ScanCommand) -> Result<String> {
    let git = GitCli::open(&cmd.repo)?;
    let config = config::load_config(&cmd.repo)?;
    warn_on_legacy_metric(&config);
    let patterns =
        PatternSet::from_config(&cmd.repo, &config.patterns, cmd.patterns_file.as_deref());
    let revisions = select_revisions(cmd.base.as_deref(), cmd.head.as_deref(), None);

    let attribution = compute_attribution(&git, &revisions, &patterns, config.volume.metric)?;
    let format = match cmd.format {
        crate::cli::ReportFormat::Json => report::OutputFormat::Json,
        crate::cli::ReportFormat::Md => report::OutputFormat::Md,
    };
    report::render(&attribution, format)
}
