use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Cachet operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CachetError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A forced-module notation could not be parsed into a selector.
    #[error("Invalid module notation '{notation}': {reason}")]
    #[diagnostic(help("Use 'group:name:version' or {{ group, name, version }}"))]
    InvalidNotation { notation: String, reason: String },

    /// A duration unit name was not recognized.
    #[error("Unknown time unit '{unit}'")]
    #[diagnostic(help(
        "Valid units: nanoseconds, microseconds, milliseconds, seconds, minutes, hours, days"
    ))]
    UnknownTimeUnit { unit: String },

    /// Invalid or malformed configuration (e.g. cachet.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your cachet.toml for syntax errors"))]
    Config { message: String },

    /// A rule script failed to compile or evaluate.
    #[error("Rule script '{expression}' failed: {message}")]
    Script { expression: String, message: String },

    /// Strict conflict resolution found multiple versions of a module.
    #[error("Version conflict: {message}")]
    #[diagnostic(help("Force one version with `force` or relax conflict resolution"))]
    VersionConflict { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type CachetResult<T> = miette::Result<T>;
