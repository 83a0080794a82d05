use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// Nothing listens on the discard port; any GitHub call fails fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn orgchart_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("orgchart"));
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_API_URL")
        .env("RUST_LOG", "info");
    cmd
}

fn connection_args(data_url: &str) -> Vec<&str> {
    vec![
        "--data-url",
        data_url,
        "--github-org",
        "acme",
        "--github-token",
        "test",
        "--github-api-url",
        UNREACHABLE_API,
    ]
}

fn write_chart(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write chart");
    path.display().to_string()
}

#[test]
fn help_lists_subcommands() {
    orgchart_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("gh-sync"))
        .stdout(contains("diff"));
}

#[test]
fn sync_help_documents_flags() {
    orgchart_cmd()
        .args(["gh-sync", "--help"])
        .assert()
        .success()
        .stdout(contains("--data-url"))
        .stdout(contains("--github-team-prefix"))
        .stdout(contains("--dry-run"))
        .stdout(contains("--lenient-deletes"));
}

#[test]
fn missing_org_is_a_usage_error() {
    orgchart_cmd()
        .args(["gh-sync", "--data-url", "chart.json", "--github-token", "t"])
        .assert()
        .failure()
        .stderr(contains("--github-org"));
}

#[test]
fn missing_chart_fails_before_contacting_github() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.json").display().to_string();

    orgchart_cmd()
        .arg("gh-sync")
        .args(connection_args(&missing))
        .assert()
        .failure()
        .stderr(contains("retrieving org chart data"))
        .stderr(contains("org chart not found"));
}

#[test]
fn inconsistent_chart_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let chart = write_chart(
        dir.path(),
        "chart.yaml",
        "teams:\n  - id: eng\n    name: Engineering\nemployees:\n  - id: ada\n    name: Ada\n    github: ada-gh\n    memberOf: design\n",
    );

    orgchart_cmd()
        .arg("diff")
        .args(connection_args(&chart))
        .assert()
        .failure()
        .stderr(contains("retrieving org chart data"))
        .stderr(contains("could not find team design for member ada"));
}

#[test]
fn unreachable_github_fails_after_loading_chart() {
    let dir = TempDir::new().expect("tempdir");
    let chart = write_chart(
        dir.path(),
        "chart.json",
        r#"{"teams": [{"id": "eng", "name": "Engineering"}], "employees": []}"#,
    );

    orgchart_cmd()
        .args(["gh-sync", "--dry-run"])
        .args(connection_args(&chart))
        .assert()
        .failure()
        .stderr(contains("retrieving github data"));
}
