#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;
use tempfile::TempDir;

const CI_ENV: &[&str] = &[
    "GITHUB_EVENT_PATH",
    "GITHUB_OUTPUT",
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_BASE_REF",
    "GITHUB_API_URL",
    "RUST_LOG",
];

fn git(repo: &Path, args: &[&str]) -> String {
    let output = ProcessCommand::new("git")
        .arg("-C")
        .arg(repo)
        .args(["-c", "commit.gpgsign=false", "-c", "core.hooksPath=/dev/null"])
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {:?} should succeed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit_lines(
    repo: &Path,
    file: &str,
    lines: usize,
    name: &str,
    email: &str,
    message: &str,
) -> String {
    let content: String = (0..lines).map(|i| format!("line {i}\n")).collect();
    fs::write(repo.join(file), content).expect("file should write");
    git(repo, &["add", file]);
    git(
        repo,
        &[
            "-c",
            &format!("user.name={name}"),
            "-c",
            &format!("user.email={email}"),
            "commit",
            "-q",
            "-m",
            message,
        ],
    );
    git(repo, &["rev-parse", "HEAD"])
}

struct Fixture {
    dir: TempDir,
    base: String,
    head: String,
}

impl Fixture {
    /// base commit, then 10 human lines, 5 lines with the marker, 5 lines by copilot
    fn scenario() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        git(dir.path(), &["init", "-q"]);
        let jane = "jane@example.com";
        let base = commit_lines(dir.path(), "README.md", 1, "Jane", jane, "Initial");
        commit_lines(dir.path(), "human.txt", 10, "Jane", jane, "Human work");
        commit_lines(
            dir.path(),
            "marked.txt",
            5,
            "Jane",
            "jane@example.com",
            "Generated helpers\n\nAI: true",
        );
        let head = commit_lines(
            dir.path(),
            "copilot.txt",
            5,
            "Copilot",
            "copilot@users.noreply.github.com",
            "Add tests",
        );
        Self { dir, base, head }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_event(&self, body: &str) -> PathBuf {
        let event = serde_json::json!({
            "pull_request": {
                "number": 7,
                "body": body,
                "base": { "ref": "main", "sha": self.base },
                "head": { "ref": "feature", "sha": self.head }
            },
            "repository": { "full_name": "acme/widgets" }
        });
        let path = self.path().join("event.json");
        fs::write(&path, event.to_string()).expect("event should write");
        path
    }

    fn output_path(&self) -> PathBuf {
        let path = self.path().join("github_output");
        if !path.exists() {
            fs::write(&path, "").expect("output file should write");
        }
        path
    }

    fn run(&self, event: &Path) -> Command {
        let mut cmd = attribution();
        cmd.arg("run")
            .arg("--repo")
            .arg(self.path())
            .env("GITHUB_EVENT_PATH", event)
            .env("GITHUB_OUTPUT", self.output_path());
        cmd
    }
}

fn attribution() -> Command {
    let mut cmd = Command::cargo_bin("pr-attribution").expect("binary should compile");
    for key in CI_ENV {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn run_writes_report_and_summary_outputs() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("## AI usage\n**Declared-AI-Percent**: 70\n");

    fixture
        .run(&event)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "AI attribution: computed 50%, declared 70%, final 70%",
        ));

    let outputs = fs::read_to_string(fixture.output_path()).expect("outputs should read");
    assert!(outputs.contains("report<<ATTRIBUTION_EOF_"));
    assert!(outputs.contains("<!-- pr-attribution-report -->"));
    assert!(outputs.contains("| Human lines | 10 |"));
    assert!(outputs.contains("| AI lines | 10 |"));
    assert!(outputs.contains("summary=AI attribution: computed 50%, declared 70%, final 70%"));
}

#[test]
fn computed_percent_wins_when_higher_than_declared() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("Declared-AI-Percent: 10");

    fixture
        .run(&event)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("final 50%"));
}

#[test]
fn missing_declaration_rejects_without_writing_outputs() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("No declaration in this description.");

    fixture
        .run(&event)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Declared-AI-Percent"));

    let outputs = fs::read_to_string(fixture.output_path()).expect("outputs should read");
    assert!(outputs.is_empty(), "no outputs should be written on rejection");
}

#[test]
fn out_of_range_declaration_is_rejected() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("Declared-AI-Percent:140");

    fixture
        .run(&event)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("outside 0..=100"));

    let outputs = fs::read_to_string(fixture.output_path()).expect("outputs should read");
    assert!(outputs.is_empty(), "no outputs should be written on rejection");
}

#[test]
fn non_integer_declaration_is_rejected_without_writing_outputs() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("**Declared-AI-Percent**: 0-100\n");

    fixture
        .run(&event)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("`0-100` is not an integer"))
        .stderr(predicate::str::contains("expected a line such as"));

    let outputs = fs::read_to_string(fixture.output_path()).expect("outputs should read");
    assert!(outputs.is_empty(), "no outputs should be written on rejection");
}

#[test]
fn failed_refetch_still_rejects_missing_declaration() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("No declaration in this description.");

    fixture
        .run(&event)
        .env("GITHUB_TOKEN", "ghs_test")
        .arg("--api-url")
        .arg("http://127.0.0.1:9")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refetch of pull request body failed"))
        .stderr(predicate::str::contains("Declared-AI-Percent"));

    let outputs = fs::read_to_string(fixture.output_path()).expect("outputs should read");
    assert!(outputs.is_empty(), "no outputs should be written on rejection");
}

#[test]
fn no_refetch_flag_skips_the_api() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("No declaration in this description.");

    fixture
        .run(&event)
        .env("GITHUB_TOKEN", "ghs_test")
        .arg("--api-url")
        .arg("http://127.0.0.1:9")
        .arg("--no-refetch")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refetch of pull request body failed").not());
}

#[test]
fn refetch_disabled_in_config_skips_the_api() {
    let fixture = Fixture::scenario();
    fs::write(
        fixture.path().join("attribution.toml"),
        "[declaration]\nrefetch = false\n",
    )
    .expect("repo config should write");
    let event = fixture.write_event("No declaration in this description.");

    fixture
        .run(&event)
        .env("GITHUB_TOKEN", "ghs_test")
        .arg("--api-url")
        .arg("http://127.0.0.1:9")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refetch of pull request body failed").not());
}

#[test]
fn merge_commits_are_not_counted_twice() {
    let fixture = Fixture::scenario();
    let repo = fixture.path();
    git(repo, &["checkout", "-q", "-b", "side"]);
    commit_lines(
        repo,
        "side.txt",
        2,
        "Copilot",
        "copilot@users.noreply.github.com",
        "Side work",
    );
    git(repo, &["checkout", "-q", "-"]);
    git(
        repo,
        &[
            "-c",
            "user.name=Jane",
            "-c",
            "user.email=jane@example.com",
            "merge",
            "-q",
            "--no-ff",
            "-m",
            "Merge side",
            "side",
        ],
    );

    attribution()
        .arg("scan")
        .arg("--repo")
        .arg(repo)
        .arg("--base")
        .arg(&fixture.base)
        .arg("--format")
        .arg("json")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"ai_volume\": 12"))
        .stdout(predicate::str::contains("\"human_volume\": 10"));
}

#[test]
fn empty_range_reports_declaration_only() {
    let fixture = Fixture::scenario();
    let event = serde_json::json!({
        "pull_request": {
            "number": 7,
            "body": "Declared-AI-Percent: 20",
            "base": { "sha": fixture.head },
            "head": { "sha": fixture.head }
        }
    });
    let event_path = fixture.path().join("empty-event.json");
    fs::write(&event_path, event.to_string()).expect("event should write");

    fixture
        .run(&event_path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("computed 0%, declared 20%, final 20%"));

    let outputs = fs::read_to_string(fixture.output_path()).expect("outputs should read");
    assert!(outputs.contains("_No commits in range._"));
}

#[test]
fn unresolvable_base_is_fatal() {
    let fixture = Fixture::scenario();
    let event = serde_json::json!({
        "pull_request": {
            "number": 7,
            "body": "Declared-AI-Percent: 20",
            "base": { "sha": "0123456789012345678901234567890123456789" },
            "head": { "sha": fixture.head }
        }
    });
    let event_path = fixture.path().join("bad-base.json");
    fs::write(&event_path, event.to_string()).expect("event should write");

    fixture
        .run(&event_path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cannot resolve revision"));
}

#[test]
fn run_requires_event_payload() {
    let fixture = Fixture::scenario();
    attribution()
        .arg("run")
        .arg("--repo")
        .arg(fixture.path())
        .env("GITHUB_OUTPUT", fixture.output_path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("GITHUB_EVENT_PATH"));
}

#[test]
fn run_requires_output_sink() {
    let fixture = Fixture::scenario();
    let event = fixture.write_event("Declared-AI-Percent: 5");
    attribution()
        .arg("run")
        .arg("--repo")
        .arg(fixture.path())
        .env("GITHUB_EVENT_PATH", &event)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("GITHUB_OUTPUT"));
}

#[test]
fn push_event_without_pull_request_is_fatal() {
    let fixture = Fixture::scenario();
    let event_path = fixture.path().join("push.json");
    fs::write(&event_path, r#"{"ref": "refs/heads/main"}"#).expect("event should write");

    fixture
        .run(&event_path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no pull_request object"));
}

#[test]
fn extra_pattern_file_reclassifies_commits() {
    let fixture = Fixture::scenario();
    let patterns = fixture.path().join("patterns.txt");
    fs::write(&patterns, "# treat jane as an agent\njane@example\\.com\n([broken\n")
        .expect("pattern file should write");
    let event = fixture.write_event("Declared-AI-Percent: 0");

    fixture
        .run(&event)
        .arg("--patterns-file")
        .arg(&patterns)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("computed 100%, declared 0%, final 100%"));
}

#[test]
fn scan_json_reports_computed_attribution() {
    let fixture = Fixture::scenario();
    attribution()
        .arg("scan")
        .arg("--repo")
        .arg(fixture.path())
        .arg("--base")
        .arg(&fixture.base)
        .arg("--format")
        .arg("json")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"computed_percent\": 50"))
        .stdout(predicate::str::contains("\"ai_volume\": 10"));
}

#[test]
fn declaration_reads_stdin() {
    attribution()
        .arg("declaration")
        .write_stdin("Summary\n\n**Declared-AI-Percent**: 42\n")
        .assert()
        .code(0)
        .stdout(predicate::str::diff("42\n"));
}

#[test]
fn declaration_rejects_missing_field() {
    attribution()
        .arg("declaration")
        .write_stdin("Nothing declared")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected a line such as"));
}
