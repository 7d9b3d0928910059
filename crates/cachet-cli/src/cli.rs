//! CLI argument definitions for Cachet.
//!
//! Each command corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cachet_util::time::parse_age_millis;

#[derive(Parser, Debug)]
#[command(
    name = "cachet",
    version,
    about = "Inspect dependency cache policy and resolve rules",
    long_about = "Cachet evaluates the resolution strategy declared in cachet.toml: which cached \
                  dependency versions, module descriptors and artifacts must be refreshed, and \
                  how forced modules and resolve rules rewrite dependency requests."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the strategy file (defaults to ./cachet.toml)
    #[arg(short, long, global = true, env = "CACHET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the cache policy whether a cached entry must be refreshed
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },

    /// Run coordinates through forcing and resolve rules
    Apply {
        /// Requested coordinates (group:name:version)
        #[arg(required = true)]
        coordinates: Vec<String>,
    },

    /// Show the configured resolution strategy
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CheckTarget {
    /// A dynamic version previously resolved to a concrete one
    Dependency {
        /// Requested selector, e.g. org.example:lib:1.+
        selector: String,
        /// Version the selector was resolved to
        #[arg(long)]
        resolved: String,
        /// Age of the cached resolution (e.g. 5000, 30s, 2d)
        #[arg(long, value_parser = parse_age)]
        age: u64,
    },

    /// A cached module descriptor
    Module {
        /// Module coordinate (group:name:version)
        module: String,
        /// Age of the cached descriptor
        #[arg(long, value_parser = parse_age)]
        age: u64,
        /// The module is changing (e.g. a snapshot)
        #[arg(long)]
        changing: bool,
        /// The cache recorded the module as missing
        #[arg(long)]
        missing: bool,
    },

    /// A cached artifact file
    Artifact {
        /// Owning module coordinate (group:name:version)
        module: String,
        /// Artifact name (defaults to the module name)
        #[arg(long)]
        artifact: Option<String>,
        /// Artifact type
        #[arg(long = "type", default_value = "jar")]
        kind: String,
        /// File extension (defaults to the type)
        #[arg(long)]
        extension: Option<String>,
        /// Classifier, e.g. sources
        #[arg(long)]
        classifier: Option<String>,
        /// Age of the cached artifact; 0 means resolved earlier in this run
        #[arg(long, value_parser = parse_age)]
        age: u64,
        /// The cache recorded the artifact as missing
        #[arg(long)]
        missing: bool,
        /// The owning module is changing
        #[arg(long)]
        changing_module: bool,
        /// Age of the owning module's descriptor
        #[arg(long, value_parser = parse_age, default_value = "0")]
        descriptor_age: u64,
        /// The descriptor hash no longer matches the one recorded with the artifact
        #[arg(long)]
        descriptor_out_of_sync: bool,
    },
}

fn parse_age(s: &str) -> Result<u64, String> {
    parse_age_millis(s).map_err(|e| e.to_string())
}

/// Parse command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}
