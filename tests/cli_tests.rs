//! Integration tests for the command-line driver
//!
//! Tests validate:
//! - Help and model listing
//! - Configuration errors exit non-zero before any stepping
//! - A short run prints beats and writes the final state

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("cardiac-cell-kernel"))
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--model ID"))
        .stdout(predicate::str::contains("--save-state FILE"));
}

#[test]
fn test_list_models() {
    cli()
        .arg("--list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("LR91"))
        .stdout(predicate::str::contains("TNNP"));
}

#[test]
fn test_unknown_option_fails() {
    cli()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option '--frobnicate'"));
}

#[test]
fn test_unknown_model_fails() {
    cli()
        .args(["--model", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown model identifier 'NOPE'"));
}

#[test]
fn test_unrecognized_agent_fails() {
    cli()
        .args(["--agent", "NOT_A_DRUG", "--drug", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NOT_A_DRUG"))
        .stdout(predicate::str::contains("Beat").not());
}

#[test]
fn test_out_of_range_proportion_fails() {
    cli()
        .args(["--iso", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("iso"));
}

#[test]
fn test_short_run_saves_state() {
    let tmp = TempDir::new().unwrap();
    let state = tmp.path().join("final.json");

    cli()
        .args(["--model", "TNNP", "--beats", "1", "--bcl", "300"])
        .arg("--save-state")
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Model: TNNP"))
        .stdout(predicate::str::contains("Beat   1"));

    assert!(state.exists());
    let json = std::fs::read_to_string(&state).unwrap();
    assert!(json.contains("\"v_mV\""));
}

#[test]
fn test_load_state_round_trip() {
    let tmp = TempDir::new().unwrap();
    let state = tmp.path().join("state.json");
    std::fs::write(&state, r#"{ "v_mV": -85.0 }"#).unwrap();

    cli()
        .args(["--model", "TNNP", "--beats", "1", "--bcl", "300"])
        .arg("--load-state")
        .arg(&state)
        .assert()
        .success();
}
