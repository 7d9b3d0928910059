use cachet_core::coordinate::{ArtifactIdentifier, ModuleVersionIdentifier, ModuleVersionSelector};

#[test]
fn selector_parse_valid() {
    let sel = ModuleVersionSelector::parse("com.example:my-lib:1.+").unwrap();
    assert_eq!(sel.group, "com.example");
    assert_eq!(sel.name, "my-lib");
    assert_eq!(sel.version, "1.+");
}

#[test]
fn selector_parse_two_parts_returns_none() {
    assert!(ModuleVersionSelector::parse("group:name").is_none());
}

#[test]
fn selector_parse_empty_string() {
    assert!(ModuleVersionSelector::parse("").is_none());
}

#[test]
fn selector_parse_empty_segment_returns_none() {
    assert!(ModuleVersionSelector::parse("org::1.0").is_none());
    assert!(ModuleVersionSelector::parse("org:foo:").is_none());
}

#[test]
fn selector_parse_four_parts_returns_none() {
    assert!(ModuleVersionSelector::parse("group:name:version:extra").is_none());
}

#[test]
fn selector_display_roundtrip() {
    let s = "com.example:my-lib:[1.0,2.0)";
    let sel = ModuleVersionSelector::parse(s).unwrap();
    assert_eq!(sel.to_string(), s);
}

#[test]
fn selector_module_key_ignores_version() {
    let sel = ModuleVersionSelector::new("org", "foo", "1.0");
    assert_eq!(sel.module_key(), "org:foo");
}

#[test]
fn identifier_parse_and_display() {
    let id = ModuleVersionIdentifier::parse("org:foo:1.2.3").unwrap();
    assert_eq!(id, ModuleVersionIdentifier::new("org", "foo", "1.2.3"));
    assert_eq!(id.to_string(), "org:foo:1.2.3");
}

#[test]
fn artifact_file_name_without_classifier() {
    let artifact = ArtifactIdentifier::jar(ModuleVersionIdentifier::new("org", "foo", "1.0"));
    assert_eq!(artifact.file_name(), "foo-1.0.jar");
}

#[test]
fn artifact_file_name_with_classifier() {
    let mut artifact =
        ArtifactIdentifier::jar(ModuleVersionIdentifier::new("org", "foo", "1.0-SNAPSHOT"));
    artifact.classifier = Some("sources".to_string());
    assert_eq!(artifact.file_name(), "foo-1.0-SNAPSHOT-sources.jar");
    assert!(artifact.to_string().contains("org:foo:1.0-SNAPSHOT"));
}
