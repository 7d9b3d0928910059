use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cachet_cmd() -> Command {
    Command::cargo_bin("cachet").unwrap()
}

#[test]
fn test_apply_without_config_leaves_coordinates() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["apply", "org:foo:0.9", "org:bar:1.0"])
        .assert()
        .success()
        .stdout("org:foo:0.9\norg:bar:1.0\n");
}

#[test]
fn test_apply_forced_then_rewritten() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cachet.toml"),
        r#"
[resolution]
force = ["org:foo:1.0"]

[[resolution.each-dependency]]
when = 'name == "foo" && target_version == "1.0"'
use-version = "2.0"
"#,
    )
    .unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["apply", "org:foo:0.9", "org:bar:0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org:foo:0.9 -> org:foo:2.0"))
        .stdout(predicate::str::contains("org:bar:0.9\n"));
}

#[test]
fn test_apply_strict_conflict_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cachet.toml"),
        "[resolution]\nfail-on-version-conflict = true\n",
    )
    .unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["apply", "org:a:1.0", "org:a:2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version conflict: org:a (1.0, 2.0)"));
}

#[test]
fn test_apply_latest_conflict_only_warns() {
    let tmp = TempDir::new().unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["apply", "org:a:1.0", "org:a:2.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Version conflicts (1):"));
}

#[test]
fn test_apply_forcing_resolves_strict_conflict() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cachet.toml"),
        "[resolution]\nforce = [\"org:a:2.0\"]\nfail-on-version-conflict = true\n",
    )
    .unwrap();

    cachet_cmd()
        .current_dir(tmp.path())
        .args(["apply", "org:a:1.0", "org:a:2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org:a:1.0 -> org:a:2.0"));
}
