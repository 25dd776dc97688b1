//! `stamina.data.clean` wipes framework state before bootstrap.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn clean_flag_wipes_the_data_directory() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("sys")).unwrap();
    let stale = home.path().join("data/stale-state.bin");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, b"leftovers").unwrap();

    Command::cargo_bin("stamina")
        .unwrap()
        .arg("--home")
        .arg(home.path())
        .arg("-D")
        .arg("stamina.data.clean=true")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stamina"));

    assert!(!stale.exists());
    // The directory itself is recreated for the new run.
    assert!(home.path().join("data").is_dir());
}

#[test]
fn data_survives_without_the_clean_flag() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("sys")).unwrap();
    let state = home.path().join("data/state.bin");
    fs::create_dir_all(state.parent().unwrap()).unwrap();
    fs::write(&state, b"keep me").unwrap();

    Command::cargo_bin("stamina")
        .unwrap()
        .arg("--home")
        .arg(home.path())
        .arg("version")
        .assert()
        .success();

    assert_eq!(fs::read(&state).unwrap(), b"keep me");
}
