use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

/// Config that points every external tool at a program that does not exist,
/// so results only depend on the files in the fixture.
const NO_TOOLS_CONFIG: &str = r#"
tools:
  python_lint: { program: repohealth-missing-flake8 }
  js_lint: { program: repohealth-missing-eslint }
  vulnerability_scanner: { program: repohealth-missing-safety }
  test_collector: { program: repohealth-missing-pytest }
"#;

fn repohealth(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_repohealth"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run repohealth")
}

fn write(root: &Path, rel: &str, content: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).expect("mkdir");
    fs::write(p, content).expect("write fixture");
}

fn analyze_json(repo: &Path, config: &Path) -> serde_json::Value {
    let output = repohealth(&[
        "analyze",
        repo.to_str().unwrap(),
        "--format",
        "json",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "analyze failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("valid JSON report")
}

#[test]
fn missing_repository_exits_non_zero() {
    let td = tempdir().expect("tempdir");
    let missing = td.path().join("nope");

    let output = repohealth(&["analyze", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}

#[test]
fn empty_repository_scores_zero_with_every_category() {
    let td = tempdir().expect("tempdir");
    let repo = td.path().join("repo");
    fs::create_dir(&repo).expect("mkdir");
    let config = td.path().join("config.yaml");
    fs::write(&config, NO_TOOLS_CONFIG).expect("write config");

    let report = analyze_json(&repo, &config);

    assert_eq!(report["health_score"], 0);
    let checks = report["checks"].as_object().expect("checks map");
    let categories: Vec<&str> = checks.keys().map(String::as_str).collect();
    for expected in [
        "code_quality",
        "security",
        "testing",
        "documentation",
        "dependencies",
        "performance",
    ] {
        assert!(categories.contains(&expected), "missing {expected}");
        assert!(!checks[expected].as_array().unwrap().is_empty());
    }
}

#[test]
fn findings_do_not_change_exit_code() {
    let td = tempdir().expect("tempdir");
    let repo = td.path().join("repo");
    write(&repo, "settings.py", "PASSWORD = \"hunter2\"\n");
    write(&repo, "README.md", "## Installation\n## Usage\n");
    let config = td.path().join("config.yaml");
    fs::write(&config, NO_TOOLS_CONFIG).expect("write config");

    let report = analyze_json(&repo, &config);

    let security = report["checks"]["security"].as_array().unwrap();
    assert_eq!(security[0]["check_name"], "secret_detection");
    assert_eq!(security[0]["status"], "failed");
    assert_eq!(security[0]["severity"], "high");

    let docs = report["checks"]["documentation"].as_array().unwrap();
    assert_eq!(docs[0]["status"], "warning");
    assert_eq!(docs[0]["message"], "README missing sections: contributing");

    let priorities: Vec<&str> = report["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["priority"].as_str().unwrap())
        .collect();
    assert!(priorities.contains(&"critical"));
    assert!(priorities.contains(&"medium"));
}

#[test]
fn summary_written_to_file_is_plain_text() {
    let td = tempdir().expect("tempdir");
    let repo = td.path().join("repo");
    write(&repo, "README.md", "Installation Usage Contributing\n");
    write(&repo, "LICENSE", "MIT\n");
    let config = td.path().join("config.toml");
    fs::write(
        &config,
        "[tools.python_lint]\nprogram = \"repohealth-missing-flake8\"\n",
    )
    .expect("write config");
    let out_file = td.path().join("report.txt");

    let output = repohealth(&[
        "analyze",
        repo.to_str().unwrap(),
        "--output",
        out_file.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "analyze failed: {output:?}");

    let text = fs::read_to_string(&out_file).expect("report written");
    assert!(text.contains("Health Score: "));
    assert!(text.contains("Summary by Category:"));
    assert!(text.contains("  Documentation: 2/2 passed\n"));
    assert!(text.contains("[HIGH] Improve test coverage: Testing setup needs improvement"));
    assert!(!text.contains('\u{1b}'), "escape codes in file output");
}

#[test]
fn invalid_config_is_rejected() {
    let td = tempdir().expect("tempdir");
    let config = td.path().join("config.yaml");
    fs::write(&config, "max_lint_files: 0\n").expect("write config");

    let output = repohealth(&[
        "analyze",
        td.path().to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("max_lint_files"));
}

#[test]
fn lint_missing_file_fails() {
    let td = tempdir().expect("tempdir");
    let missing = td.path().join("absent.py");

    let output = repohealth(&["lint", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
