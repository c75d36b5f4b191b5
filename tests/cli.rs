use assert_cmd::Command;
use predicates::prelude::*;

const GITHUB_VARS: &[&str] = &[
    "GITHUB_API_URL",
    "GITHUB_TOKEN",
    "GITHUB_EVENT_NAME",
    "GITHUB_EVENT_PATH",
    "GITHUB_REPOSITORY",
    "GITHUB_OUTPUT",
    "GITHUB_STEP_SUMMARY",
    "RUNNER_TOOL_CACHE",
];

fn pmdgate(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("pmdgate").unwrap();
    cmd.current_dir(dir);
    for var in GITHUB_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn schema_describes_config() {
    let dir = tempfile::tempdir().unwrap();
    pmdgate(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze_modified_files_only"))
        .stdout(predicate::str::contains("minimum_priority"));
}

#[test]
fn resolve_rejects_latest_with_download_url() {
    let dir = tempfile::tempdir().unwrap();
    pmdgate(dir.path())
        .args([
            "resolve",
            "--pmd-version",
            "latest",
            "--download-url",
            "https://example.invalid/pmd.zip",
            "--tool-cache",
        ])
        .arg(dir.path().join("cache"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"))
        .stderr(predicate::str::contains("latest"));
}

#[test]
fn run_rejects_malformed_version() {
    let dir = tempfile::tempdir().unwrap();
    pmdgate(dir.path())
        .args(["run", "--pmd-version", "6.55"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version '6.55'"));
}

#[test]
fn changed_files_for_unsupported_event() {
    let dir = tempfile::tempdir().unwrap();
    pmdgate(dir.path())
        .args(["changed-files", "--event-name", "workflow_dispatch"])
        .assert()
        .success()
        .stdout("<unsupported>\n");
}

#[test]
fn changed_files_without_event() {
    let dir = tempfile::tempdir().unwrap();
    pmdgate(dir.path())
        .arg("changed-files")
        .assert()
        .success()
        .stdout("<unsupported>\n");
}

#[test]
fn config_file_values_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pmdgate.yaml"),
        "version: 7.0.0\nminimum_priority: 9\n",
    )
    .unwrap();
    pmdgate(dir.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Minimum priority"));
}
