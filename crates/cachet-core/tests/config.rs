use cachet_core::config::{CacheAction, StrategyConfig, TtlConfig};
use cachet_util::time::TimeUnit;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_empty_config_is_default() {
    let config = StrategyConfig::parse_toml("").unwrap();
    assert!(config.resolution.force.is_empty());
    assert!(!config.resolution.fail_on_version_conflict);
    assert!(config.cache.dynamic_versions.is_none());
    assert!(config.cache.artifact.is_empty());
}

#[test]
fn test_full_config_parses() {
    let toml = r#"
[resolution]
force = ["org:foo:1.0", { group = "org", name = "bar", version = "2.0" }]
fail-on-version-conflict = true

[[resolution.each-dependency]]
when = 'group == "org.legacy"'
use-version = "3.1"

[cache]
dynamic-versions = { value = 10, unit = "minutes" }
changing-modules = { value = 4, unit = "HOURS" }

[[cache.module]]
when = "changing"
action = "cache-for"
ttl = { value = 30, unit = "seconds" }

[[cache.artifact]]
action = "use-cached"
"#;
    let config = StrategyConfig::parse_toml(toml).unwrap();
    assert_eq!(config.resolution.force.len(), 2);
    assert!(config.resolution.fail_on_version_conflict);
    assert_eq!(config.resolution.each_dependency[0].use_version, "3.1");
    assert_eq!(
        config.cache.dynamic_versions,
        Some(TtlConfig {
            value: 10,
            unit: TimeUnit::Minutes
        })
    );
    assert_eq!(config.cache.changing_modules.unwrap().to_millis(), 14_400_000);
    assert_eq!(config.cache.module[0].action, CacheAction::CacheFor);
    assert_eq!(config.cache.module[0].when.as_deref(), Some("changing"));
    assert_eq!(config.cache.artifact[0].action, CacheAction::UseCached);
    assert!(config.cache.artifact[0].when.is_none());
}

#[test]
fn test_unknown_time_unit_fails_at_parse() {
    let err = StrategyConfig::parse_toml(
        r#"
[cache]
dynamic-versions = { value = 1, unit = "weeks" }
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "got: {err}");
}

#[test]
fn test_cache_for_without_ttl_rejected() {
    let err = StrategyConfig::parse_toml(
        r#"
[[cache.dependency]]
action = "cache-for"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("needs a ttl"), "got: {err}");
}

#[test]
fn test_ttl_on_refresh_rejected() {
    let err = StrategyConfig::parse_toml(
        r#"
[[cache.artifact]]
action = "refresh"
ttl = { value = 1, unit = "days" }
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("only allowed"), "got: {err}");
}

#[test]
fn test_unknown_key_rejected() {
    assert!(StrategyConfig::parse_toml("[resolution]\nforced = []\n").is_err());
}

#[test]
fn test_load_missing_file_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = StrategyConfig::load(tmp.path()).unwrap();
    assert!(config.resolution.force.is_empty());
}

#[test]
fn test_load_reads_cachet_toml() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cachet.toml"),
        "[resolution]\nfail-on-version-conflict = true\n",
    )
    .unwrap();
    let config = StrategyConfig::load(tmp.path()).unwrap();
    assert!(config.resolution.fail_on_version_conflict);
}

#[test]
fn test_from_path_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    assert!(StrategyConfig::from_path(&tmp.path().join("nope.toml")).is_err());
}
