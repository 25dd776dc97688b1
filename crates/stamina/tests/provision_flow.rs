//! Descriptor-driven provisioning through the launcher.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn provisions_artifacts_from_a_descriptor() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("sys")).unwrap();

    let library = home.path().join("library.jar");
    fs::write(&library, b"bundle bytes").unwrap();
    let settings = home.path().join("realm.cfg");
    fs::write(&settings, b"realm.name=test").unwrap();

    let descriptor = home.path().join("bootstrap.spf");
    fs::write(
        &descriptor,
        format!(
            "# bootstrap profile\n{}\n\n{}\n",
            library.display(),
            settings.display()
        ),
    )
    .unwrap();

    Command::cargo_bin("stamina")
        .unwrap()
        .arg("--home")
        .arg(home.path())
        .arg("provision:install")
        .arg(descriptor.display().to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("Platform provisioning done"));

    // One .jar under data/provision, the .cfg under etc.
    let provisioned: Vec<_> = fs::read_dir(home.path().join("data/provision"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(provisioned.len(), 1);
    assert!(provisioned[0].ends_with(".jar"));

    let configs: Vec<_> = fs::read_dir(home.path().join("etc"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(configs.iter().any(|name| name.ends_with(".cfg")));
}

#[test]
fn reprovisioning_is_idempotent() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("sys")).unwrap();

    let library = home.path().join("library.jar");
    fs::write(&library, b"bundle bytes").unwrap();
    let descriptor = home.path().join("bootstrap.spf");
    fs::write(&descriptor, format!("{}\n", library.display())).unwrap();

    for expectation in ["Provisioned", "Already provisioned"] {
        Command::cargo_bin("stamina")
            .unwrap()
            .arg("--home")
            .arg(home.path())
            .arg("provision:install")
            .arg(descriptor.display().to_string())
            .assert()
            .success()
            .stdout(predicate::str::contains(expectation));
    }

    assert_eq!(
        fs::read_dir(home.path().join("data/provision"))
            .unwrap()
            .count(),
        1
    );
}
