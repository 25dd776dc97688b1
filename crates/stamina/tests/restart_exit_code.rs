//! Restart intent travels through the process exit code.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

#[test]
fn system_restart_exits_with_the_restart_code() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("sys")).unwrap();

    Command::cargo_bin("stamina")
        .unwrap()
        .arg("--home")
        .arg(home.path())
        .arg("system:restart")
        .assert()
        .code(100);
}

#[test]
fn system_stop_exits_zero() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("sys")).unwrap();

    Command::cargo_bin("stamina")
        .unwrap()
        .arg("--home")
        .arg(home.path())
        .arg("system:stop")
        .assert()
        .code(0);
}
