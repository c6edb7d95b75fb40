//! CLI integration tests for chembl
//!
//! Runs the chembl binary end-to-end with an isolated config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with its config directory pointed at `config_dir`
#[allow(deprecated)]
fn chembl_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chembl").unwrap();
    cmd.env("CHEMBL_CONFIG_DIR", config_dir.path());
    cmd.env_remove("CHEMBL_DB");
    cmd.env_remove("CHEMBL_XREF_DB");
    cmd
}

#[test]
fn test_transformers_lists_definitions() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .arg("transformers")
        .assert()
        .success()
        .stdout(predicate::str::contains("ChEMBL compound-list producer"))
        .stdout(predicate::str::contains("ChEMBL gene-target transformer"))
        .stdout(predicate::str::contains("ChEMBL metabolite transformer"))
        .stdout(predicate::str::contains("\"compounds\""));
}

#[test]
fn test_transformers_output_is_json() {
    let temp_dir = TempDir::new().unwrap();

    let output = chembl_cmd(&temp_dir)
        .args(["transformers", "--pretty"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let definitions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let definitions = definitions.as_array().unwrap();
    assert_eq!(definitions.len(), 6);
    assert_eq!(definitions[0]["function"], "producer");
}

#[test]
fn test_config_path_uses_config_dir() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(temp_dir.path().to_string_lossy().as_ref()))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_get() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["config", "set", "database.chembl_path", "/data/chembl_33.sqlite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set database.chembl_path"));
    assert!(temp_dir.path().join("config.toml").exists());

    chembl_cmd(&temp_dir)
        .args(["config", "get", "database.chembl_path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/data/chembl_33.sqlite"));

    chembl_cmd(&temp_dir)
        .args(["config", "reset", "--quiet"])
        .assert()
        .success();

    chembl_cmd(&temp_dir)
        .args(["config", "get", "database.chembl_path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("data/ChEMBL.sqlite"));
}

#[test]
fn test_config_list() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("database.xref_path = data/ChEMBL.target.xref.sqlite"))
        .stdout(predicate::str::contains("database.max_connections = 5"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["config", "get", "database.password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_rejects_zero_connections() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["config", "set", "database.max_connections", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_produce_without_database_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.sqlite");

    chembl_cmd(&temp_dir)
        .env("CHEMBL_DB", &missing)
        .args(["produce", "aspirin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database file not found"));
}

#[test]
fn test_transform_rejects_malformed_input() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["transform", "ChEMBL assay transformer"])
        .write_stdin("{\"not\": \"a collection\"}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input is not a JSON array of elements"));
}

#[test]
fn test_transform_rejects_bad_control() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .args(["transform", "ChEMBL assay transformer", "--control", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}

#[test]
fn test_doctor_reports_missing_databases() {
    let temp_dir = TempDir::new().unwrap();

    chembl_cmd(&temp_dir)
        .env("CHEMBL_DB", temp_dir.path().join("missing.sqlite"))
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] Databases: Failed to open"))
        .stdout(predicate::str::contains("Some checks failed"));
}
