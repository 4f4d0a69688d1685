// The `unreachable_pub` is to silence false positives in RustRover.
#![allow(dead_code, unreachable_pub)]

use std::path::{Path, PathBuf};
use std::process::Command;

/// Insta snapshot filters shared across poetry-to-uv tests.
pub const INSTA_FILTERS: &[(&str, &str)] = &[
    // Rewrite Windows output to Unix output
    (r"\\([\w\d]|\.)", "/$1"),
    (r"poetry-to-uv\.exe", "poetry-to-uv"),
    // poetry-to-uv version display
    (
        r"poetry-to-uv \d+\.\d+\.\d+(-(alpha|beta|rc)\.\d+)?(\+\d+)?",
        r"poetry-to-uv [VERSION]",
    ),
    // Scratch directories
    (r"(/private)?/(tmp|var/folders/[^\s`]*)/\.tmp\w+", "[TEMP_DIR]"),
    // Trim end-of-line whitespaces
    (r"([^\s])[ \t]+(\r?\n)", "$1$2"),
];

/// [`INSTA_FILTERS`] plus a filter replacing `dir` with `[TEMP_DIR]`.
pub fn temp_dir_filters(dir: &Path) -> Vec<(String, String)> {
    let mut filters = vec![(
        regex::escape(&dir.display().to_string()),
        "[TEMP_DIR]".to_owned(),
    )];
    filters.extend(
        INSTA_FILTERS
            .iter()
            .map(|(pattern, replacement)| ((*pattern).to_owned(), (*replacement).to_owned())),
    );
    filters
}

/// Returns the poetry-to-uv binary that cargo built before launching the tests.
pub fn get_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_poetry-to-uv"))
}

/// Create a `poetry-to-uv` command for testing.
pub fn poetry_to_uv_command() -> Command {
    let mut command = Command::new(get_bin());
    // Clear environment variables that might interfere with tests.
    command.env_remove("POETRY_TO_UV_POETRY");
    command.env_remove("RUST_LOG");
    command
}

/// Return the path to a fixture `pyproject.toml`.
pub fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path.push("pyproject.toml");
    path
}

/// Copy a fixture into `dir/project/pyproject.toml` and return its path.
pub fn copy_fixture(dir: &Path, name: &str) -> PathBuf {
    let project = dir.join("project");
    fs_err::create_dir_all(&project).unwrap();
    let pyproject = project.join("pyproject.toml");
    fs_err::copy(fixture(name), &pyproject).unwrap();
    pyproject
}

/// Write an executable stand-in for `poetry` that prints `stdout`.
///
/// The arguments it was called with are recorded in `dir/poetry-args`, one
/// per line.
#[cfg(unix)]
pub fn fake_poetry(dir: &Path, stdout: &str) -> PathBuf {
    write_script(
        dir,
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\ncat <<'POETRY_EXPORT'\n{stdout}POETRY_EXPORT\n",
            dir.join("poetry-args").display()
        ),
    )
}

/// Write an executable stand-in for `poetry` that fails.
#[cfg(unix)]
pub fn failing_poetry(dir: &Path, stderr: &str) -> PathBuf {
    write_script(dir, &format!("echo '{stderr}' >&2\nexit 1\n"))
}

#[cfg(unix)]
fn write_script(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-poetry");
    fs_err::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs_err::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// The arguments the last fake `poetry` run received.
pub fn recorded_args(dir: &Path) -> Vec<String> {
    fs_err::read_to_string(dir.join("poetry-args"))
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Snapshot test helper macro. Runs a command and asserts against an insta snapshot.
#[macro_export]
macro_rules! poetry_to_uv_snapshot {
    ($filters:expr, $command:expr, @$expected:literal) => {{
        let output = $command.output().expect("Failed to execute poetry-to-uv");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let mut combined = format!(
            "success: {:?}\nexit_code: {}\n----- stdout -----\n{}\n----- stderr -----\n{}",
            output.status.success(),
            output.status.code().unwrap_or(-1),
            stdout.trim(),
            stderr.trim(),
        );

        // Apply filters
        for (pattern, replacement) in $filters.iter() {
            let re = regex::Regex::new(&pattern.to_string()).expect("Invalid filter regex");
            combined = re
                .replace_all(&combined, replacement.to_string())
                .to_string();
        }

        insta::assert_snapshot!(combined, @$expected);
    }};
}
