//! Integration tests for the config command.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_config_init_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anura.toml");

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("config").arg("init").arg("--config").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[project]"));
    assert!(text.contains("timezone"));
    assert!(text.contains("thresholds"));
}

#[test]
fn test_config_init_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anura.toml");
    std::fs::write(&path, "[classes]\npositive = \"ramu\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("config").arg("init").arg("--config").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    // The hand-written file must not be clobbered.
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "[classes]\npositive = \"ramu\"\n");
}

#[test]
fn test_config_init_then_show_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anura.toml");

    let mut init = cargo_bin_cmd!("anura");
    init.arg("config").arg("init").arg("--config").arg(&path);
    init.assert().success();

    let mut show = cargo_bin_cmd!("anura");
    show.arg("config").arg("show").arg("--config").arg(&path);
    show.assert()
        .success()
        .stdout(predicate::str::contains("US/Pacific"));
}

#[test]
fn test_config_path_prints_override() {
    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("config").arg("path").arg("--config").arg("foo.toml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("foo.toml"));
}

#[test]
fn test_config_show_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("config")
        .arg("show")
        .arg("--config")
        .arg(dir.path().join("missing.toml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_config_show_invalid_toml_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anura.toml");
    std::fs::write(&path, "not valid toml [[[").unwrap();

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("config").arg("show").arg("--config").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_stage_commands_validate_config_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anura.toml");
    std::fs::write(&path, "[project]\ntimezone = \"Mars/Olympus_Mons\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("aggregate")
        .arg(dir.path().join("scores"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg("--config")
        .arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown timezone"));
}
