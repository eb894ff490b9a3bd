//! Binary-level tests. Only paths that fail or finish before reaching a
//! registry are exercised; `127.0.0.1:9` (discard) refuses connections.

use assert_cmd::Command;
use conan_sync::test_utils::ProjectFixture;
use predicates::prelude::*;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn conan_sync(project: &ProjectFixture) -> Command {
    let mut cmd = Command::cargo_bin("conan-sync").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--no-progress")
        .arg("--config")
        .arg(project.path().join("config.toml"))
        .arg("--project-dir")
        .arg(project.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("conan-sync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("versions"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn test_update_with_missing_files() {
    let project = ProjectFixture::empty().unwrap();

    conan_sync(&project)
        .args(["--registry-url", UNREACHABLE, "update", "zlib"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Required file(s) not found"))
        .stderr(predicate::str::contains("conanfile.yml"))
        .stderr(predicate::str::contains("conan.lock"));
}

#[test]
fn test_no_registry_configured() {
    let project = ProjectFixture::new(&["zlib/1.2.13"], &["zlib/1.2.13#a%1.000"]).unwrap();

    conan_sync(&project)
        .args(["latest", "zlib"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no registry selected"));
}

#[test]
fn test_unknown_registry_name() {
    let project = ProjectFixture::empty().unwrap();
    project.write("config.toml", "[registries.center]\nurl = \"https://center2.conan.io\"\n").unwrap();

    conan_sync(&project)
        .args(["--registry", "corp", "versions", "zlib"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corp"));
}

#[test]
fn test_versions_against_unreachable_registry_is_empty() {
    let project = ProjectFixture::empty().unwrap();

    conan_sync(&project)
        .args(["--registry-url", UNREACHABLE, "versions", "zlib", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_pin_with_several_packages_is_rejected() {
    let project = ProjectFixture::new(&["zlib/1.2.13"], &["zlib/1.2.13#a%1.000"]).unwrap();

    conan_sync(&project)
        .args(["--registry-url", UNREACHABLE, "update", "zlib", "fmt", "--version", "1.3.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single package"));
}

#[test]
fn test_config_add_show_remove() {
    let project = ProjectFixture::empty().unwrap();

    conan_sync(&project)
        .args(["config", "add-registry", "corp", "https://conan.example.com/api/conan/local"])
        .args(["--token", "s3cret", "--default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corp"));

    conan_sync(&project)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://conan.example.com/api/conan/local"))
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("s3cret").not());

    let saved = std::fs::read_to_string(project.path().join("config.toml")).unwrap();
    assert!(saved.contains("default_registry = \"corp\""));
    assert!(saved.contains("s3cret"));

    conan_sync(&project).args(["config", "remove-registry", "corp"]).assert().success();
    conan_sync(&project)
        .args(["config", "remove-registry", "corp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corp"));
}

#[test]
fn test_config_path_prints_location() {
    let project = ProjectFixture::empty().unwrap();

    conan_sync(&project)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
