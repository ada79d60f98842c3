//! Argument and configuration handling

use super::common::relcopy_command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_help() {
    relcopy_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--all"))
        .stdout(predicate::str::contains("--asset-filter"));
}

#[test]
fn test_tag_and_all_are_exclusive() {
    relcopy_command()
        .args(["v1.0.0", "--all", "--source", "octo/app", "--dest", "octo/mirror"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_tag_or_all_is_required() {
    relcopy_command()
        .args(["--source", "octo/app", "--dest", "octo/mirror"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_missing_source_repository() {
    relcopy_command()
        .args(["v1.0.0", "--dest", "octo/mirror"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--source"));
}

#[test]
fn test_malformed_repository() {
    relcopy_command()
        .args(["v1.0.0", "--source", "octo", "--dest", "octo/mirror"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("owner/repo"));
}

#[test]
fn test_repositories_from_environment() {
    relcopy_command()
        .env("RELCOPY_SOURCE_REPO", "octo/app")
        .env("RELCOPY_DEST_REPO", "octo/mirror")
        .env("RELCOPY_COPY_ALL", "true")
        .arg("v1.0.0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_config_file_sets_copy_all() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("relcopy.yaml");
    fs::write(
        &config,
        "source:\n  repo: octo/app\ndest:\n  repo: octo/mirror\ncopy_all: true\n",
    )
    .unwrap();

    relcopy_command()
        .arg("v1.0.0")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("relcopy.yaml");
    fs::write(&config, "source:\n  repo: octo/app\nsorting: date\n").unwrap();

    relcopy_command()
        .args(["v1.0.0", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();

    relcopy_command()
        .args(["v1.0.0", "--config"])
        .arg(temp.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.yaml"));
}
