//! Integration tests for the predict command.
//!
//! These cover argument and manifest handling. Scoring itself needs an ONNX
//! graph and runtime, which the test environment does not ship, so every
//! test here stops before a session is created.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("anura.toml");
    std::fs::write(&path, "[classes]\npositive = \"ramu\"\n").unwrap();
    path
}

#[test]
fn test_predict_requires_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("predict")
        .arg(dir.path().join("dataset"))
        .arg("-o")
        .arg(dir.path().join("scores"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no model manifest specified"));
}

#[test]
fn test_predict_missing_manifest_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("predict")
        .arg(dir.path().join("dataset"))
        .arg("-m")
        .arg(dir.path().join("nope.toml"))
        .arg("-o")
        .arg(dir.path().join("scores"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read model manifest"));
}

#[test]
fn test_predict_manifest_with_missing_graph_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let manifest = dir.path().join("model.toml");
    std::fs::write(
        &manifest,
        "model = \"missing.onnx\"\n\
         classes = [\"ramu\", \"negative\"]\n\
         sample_rate = 22050\n\
         clip_duration = 2.0\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("predict")
        .arg(dir.path().join("dataset"))
        .arg("-m")
        .arg(&manifest)
        .arg("-o")
        .arg(dir.path().join("scores"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_predict_manifest_must_list_two_classes() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let manifest = dir.path().join("model.toml");
    std::fs::write(
        &manifest,
        "model = \"rana.onnx\"\n\
         classes = [\"ramu\"]\n\
         sample_rate = 22050\n\
         clip_duration = 2.0\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("anura");
    cmd.arg("predict")
        .arg(dir.path().join("dataset"))
        .arg("-m")
        .arg(&manifest)
        .arg("-o")
        .arg(dir.path().join("scores"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exactly 2 classes"));
}
