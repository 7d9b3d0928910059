use cachet_util::errors::CachetError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = CachetError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_invalid_notation_display() {
    let err = CachetError::InvalidNotation {
        notation: "org:foo".to_string(),
        reason: "expected 3 segments".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid module notation 'org:foo': expected 3 segments"
    );
}

#[test]
fn test_unknown_time_unit_display() {
    let err = CachetError::UnknownTimeUnit {
        unit: "fortnights".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown time unit 'fortnights'");
}

#[test]
fn test_config_error_display() {
    let err = CachetError::Config {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad syntax");
}

#[test]
fn test_script_error_display() {
    let err = CachetError::Script {
        expression: "changing &&".to_string(),
        message: "unexpected end".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Rule script 'changing &&' failed: unexpected end"
    );
}

#[test]
fn test_version_conflict_display() {
    let err = CachetError::VersionConflict {
        message: "org:foo (1.0, 2.0)".to_string(),
    };
    assert_eq!(err.to_string(), "Version conflict: org:foo (1.0, 2.0)");
}

#[test]
fn test_generic_error_display() {
    let err = CachetError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_error_converts_into_report() {
    let report: miette::Report = CachetError::Generic {
        message: "boom".to_string(),
    }
    .into();
    assert!(report.downcast_ref::<CachetError>().is_some());
}
