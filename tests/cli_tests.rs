//! CLI smoke tests driving the compiled binary.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn skillmap(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("skillmap").unwrap();
    cmd.env("SKILLMAP_DATA_DIR", dir.path())
        .env("SKILLMAP_DB_PATH", dir.path().join("skillmap.db"))
        .env("NO_COLOR", "1");
    cmd
}

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn ingest_fixtures(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let hierarchy = write_fixture(
        dir,
        "hierarchy.json",
        r#"{"Programming Languages": [{"child": "Python", "weight": 0.8}]}"#,
    );
    let jobs = write_fixture(
        dir,
        "jobs.json",
        r#"[
            {"id": "j1", "attributes": {"attributes": {"competencies": [
                {"name": "eng", "skills": ["python", "sql"]}
            ]}}},
            {"id": "j2", "attributes": {"attributes": {"competencies": [
                {"name": "eng", "skills": ["python"]}
            ]}}}
        ]"#,
    );
    (hierarchy, jobs)
}

fn run_json(dir: &TempDir, args: &[&str]) -> Value {
    let output = skillmap(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn ingest_and_analyze(dir: &TempDir, hierarchy: &Path, jobs: &Path) {
    skillmap(dir)
        .args(["--robot", "ingest", "--hierarchy"])
        .arg(hierarchy)
        .arg("--jobs")
        .arg(jobs)
        .assert()
        .success();
    skillmap(dir)
        .args(["--robot", "analyze"])
        .assert()
        .success();
}

#[test]
fn status_on_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(&dir, &["--robot", "status"]);
    assert_eq!(json["skills"], 0);
    assert_eq!(json["jobs"], 0);
    assert!(json["frequencies"].is_null());
}

#[test]
fn ingest_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);

    let mut cmd = skillmap(&dir);
    cmd.args(["--robot", "ingest", "--hierarchy"])
        .arg(&hierarchy)
        .arg("--jobs")
        .arg(&jobs);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["hierarchy"]["edges_added"], 1);
    assert_eq!(json["jobs"]["processed"], 2);
    assert_eq!(json["jobs"]["mentions_recorded"], 3);
}

#[test]
fn ingest_without_inputs_fails() {
    let dir = tempfile::tempdir().unwrap();
    skillmap(&dir)
        .arg("ingest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to ingest"));
}

#[test]
fn analyze_then_top_lists_skills() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);
    ingest_and_analyze(&dir, &hierarchy, &jobs);

    let json = run_json(&dir, &["--robot", "top", "--limit", "10"]);
    assert_eq!(json["count"], 3);
    // Python and its ancestor tie on total=2; alphabetical break.
    assert_eq!(json["skills"][0]["name"], "Programming Languages");
    assert_eq!(json["skills"][0]["total_frequency"], 2);
    assert_eq!(json["skills"][1]["name"], "Python");
    assert_eq!(json["skills"][1]["direct_frequency"], 2);
}

#[test]
fn tree_shows_descendants() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);
    ingest_and_analyze(&dir, &hierarchy, &jobs);

    let json = run_json(&dir, &["--robot", "tree", "Programming Languages"]);
    assert_eq!(json["rows"][0]["name"], "Programming Languages");
    assert_eq!(json["rows"][1]["name"], "Python");
}

#[test]
fn tree_unknown_skill_errors() {
    let dir = tempfile::tempdir().unwrap();
    skillmap(&dir)
        .args(["tree", "no-such-skill"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-skill"));
}

#[test]
fn search_finds_partial_matches() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);
    ingest_and_analyze(&dir, &hierarchy, &jobs);

    let json = run_json(&dir, &["--robot", "search", "py"]);
    assert_eq!(json["count"], 1);
    assert_eq!(json["skills"][0]["name"], "Python");
}

#[test]
fn jobs_lists_postings_for_skill() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);
    ingest_and_analyze(&dir, &hierarchy, &jobs);

    let json = run_json(&dir, &["--robot", "jobs", "python"]);
    assert_eq!(json["skill"], "Python");
    assert_eq!(json["jobs"][0][0], "j1");
    assert_eq!(json["jobs"][1][0], "j2");
}

#[test]
fn reset_frequencies_only_keeps_sources() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);
    ingest_and_analyze(&dir, &hierarchy, &jobs);

    skillmap(&dir)
        .args(["--robot", "reset", "--frequencies-only", "--yes"])
        .assert()
        .success();

    let json = run_json(&dir, &["--robot", "status"]);
    assert_eq!(json["skills"], 3);
    assert_eq!(json["jobs"], 2);
    assert!(json["frequencies"].is_null());
}

#[test]
fn full_reset_empties_everything() {
    let dir = tempfile::tempdir().unwrap();
    let (hierarchy, jobs) = ingest_fixtures(&dir);
    ingest_and_analyze(&dir, &hierarchy, &jobs);

    skillmap(&dir)
        .args(["--robot", "reset", "--yes"])
        .assert()
        .success();

    let json = run_json(&dir, &["--robot", "status"]);
    assert_eq!(json["skills"], 0);
    assert_eq!(json["edges"], 0);
    assert_eq!(json["jobs"], 0);
}

#[test]
fn robot_errors_are_json_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = skillmap(&dir)
        .args(["--robot", "tree", "missing"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"], true);
    assert!(json["message"].as_str().unwrap().contains("missing"));
}
