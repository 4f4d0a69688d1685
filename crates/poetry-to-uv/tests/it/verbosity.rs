#![cfg(unix)]

use tempfile::TempDir;

use crate::common::{copy_fixture, fake_poetry, poetry_to_uv_command};

const EXPORT: &str = "boto3==1.34.2\nrequests==2.31.0\n";

#[test]
fn quiet_suppresses_warnings() {
    let dir = TempDir::new().unwrap();
    let pyproject = copy_fixture(dir.path(), "groups-and-extras");
    let poetry = fake_poetry(dir.path(), EXPORT);

    let output = poetry_to_uv_command()
        .arg("--quiet")
        .arg(&pyproject)
        .arg("--poetry")
        .arg(&poetry)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(
        stderr.is_empty(),
        "Expected no output with --quiet, got: {stderr}"
    );
    assert!(!output.stdout.is_empty());
}

#[test]
fn quiet_still_reports_errors() {
    let dir = TempDir::new().unwrap();

    let output = poetry_to_uv_command()
        .args(["--quiet", "missing.toml"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("error: No `pyproject.toml` found"), "{stderr}");
}

#[test]
fn unresolved_dependencies_are_warned_about() {
    let dir = TempDir::new().unwrap();
    let pyproject = copy_fixture(dir.path(), "groups-and-extras");
    let poetry = fake_poetry(dir.path(), EXPORT);

    let output = poetry_to_uv_command()
        .arg(&pyproject)
        .arg("--poetry")
        .arg(&poetry)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    for expected in [
        "warning: Failed to resolve dependency for `Flask_SQLAlchemy` in dependencies",
        "warning: Failed to resolve dependency for `moto[s3,sqs]` in dependencies",
        "warning: Failed to resolve dependency for `pytest` in group `dev`",
        "warning: Failed to resolve dependency for `mkdocs` in group `docs`",
    ] {
        assert!(stderr.contains(expected), "missing `{expected}` in:\n{stderr}");
    }
}

#[test]
fn verbose_shows_the_resolver_command() {
    let dir = TempDir::new().unwrap();
    let pyproject = copy_fixture(dir.path(), "minimal");
    let poetry = fake_poetry(dir.path(), EXPORT);

    let output = poetry_to_uv_command()
        .arg("-v")
        .arg(&pyproject)
        .arg("--poetry")
        .arg(&poetry)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stderr.contains("DEBUG"), "{stderr}");
    assert!(
        stderr.contains("export --format=requirements.txt --without-hashes"),
        "{stderr}"
    );
    assert!(!stderr.contains("TRACE"), "{stderr}");
}

#[test]
fn double_verbose_shows_each_resolved_version() {
    let dir = TempDir::new().unwrap();
    let pyproject = copy_fixture(dir.path(), "minimal");
    let poetry = fake_poetry(dir.path(), EXPORT);

    let output = poetry_to_uv_command()
        .arg("-vv")
        .arg(&pyproject)
        .arg("--poetry")
        .arg(&poetry)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stderr.contains("TRACE"), "{stderr}");
    assert!(stderr.contains("requests resolved to 2.31.0"), "{stderr}");
}

#[test]
fn python_constraint_is_only_logged_when_verbose() {
    let dir = TempDir::new().unwrap();
    let pyproject = copy_fixture(dir.path(), "minimal");
    let poetry = fake_poetry(dir.path(), EXPORT);

    let output = poetry_to_uv_command()
        .arg(&pyproject)
        .arg("--poetry")
        .arg(&poetry)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stderr.is_empty(), "{stderr}");
    assert!(!stdout.contains("python"), "{stdout}");

    let output = poetry_to_uv_command()
        .arg("-v")
        .arg(&pyproject)
        .arg("--poetry")
        .arg(&poetry)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(
        stderr.contains("Skipping interpreter constraint `python = ^3.11`"),
        "{stderr}"
    );
}
