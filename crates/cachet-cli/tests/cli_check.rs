use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cachet_cmd() -> Command {
    Command::cargo_bin("cachet").unwrap()
}

#[test]
fn test_check_dependency_within_default_ttl_uses_cache() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["check", "dependency", "org:foo:1.+", "--resolved", "1.3", "--age", "1d"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("use-cached org:foo:1.+"));
}

#[test]
fn test_check_dependency_past_default_ttl_refreshes() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args([
            "check",
            "dependency",
            "org:foo:1.+",
            "--resolved",
            "1.3",
            "--age",
            "86400001",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh (age 86400001ms > ttl 86400000ms)"));
}

#[test]
fn test_check_module_reads_cachet_toml() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cachet.toml"),
        "[cache]\nchanging-modules = { value = 10, unit = \"minutes\" }\n",
    )
    .unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["check", "module", "org:foo:1.0-SNAPSHOT", "--changing", "--age", "11m"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("refresh"));

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["check", "module", "org:foo:1.0-SNAPSHOT", "--age", "11m"])
        .assert()
        .success()
        .stdout(predicate::str::contains("use-cached"))
        .stdout(predicate::str::contains("no rule decided"));
}

#[test]
fn test_check_artifact_of_changing_module() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args([
            "check",
            "artifact",
            "org:foo:1.0-SNAPSHOT",
            "--age",
            "5s",
            "--changing-module",
            "--descriptor-age",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("refresh foo-1.0-SNAPSHOT.jar"));
}

#[test]
fn test_check_artifact_out_of_sync_descriptor() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args([
            "check",
            "artifact",
            "org:foo:1.0",
            "--classifier",
            "sources",
            "--age",
            "0",
            "--descriptor-age",
            "1h",
            "--descriptor-out-of-sync",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("refresh foo-1.0-sources.jar"));
}

#[test]
fn test_check_with_explicit_config_path() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("strategy.toml");
    fs::write(
        &config,
        "[[cache.artifact]]\nwhen = 'classifier == \"sources\"'\naction = \"use-cached\"\n",
    )
    .unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .args([
            "check",
            "artifact",
            "org:foo:1.0",
            "--classifier",
            "sources",
            "--age",
            "0",
            "--descriptor-out-of-sync",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("use-cached"));
}

#[test]
fn test_check_rejects_bad_coordinate() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["check", "module", "org:foo", "--age", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid module notation 'org:foo'"));
}

#[test]
fn test_check_rejects_bad_age() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["check", "module", "org:foo:1.0", "--age", "3w"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown time unit 'w'"));
}

#[test]
fn test_check_reports_broken_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cachet.toml"), "[cache\n").unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["check", "module", "org:foo:1.0", "--age", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse cachet.toml"));
}
