//! Core data types for the Cachet resolution-strategy engine.
//!
//! This crate defines module coordinates as seen by dependency resolution
//! (requested selectors, resolved identifiers, artifacts), the notation users
//! write to force module versions, and the `cachet.toml` configuration model.
//!
//! This crate is intentionally free of evaluation logic and network I/O.

/// File name of the strategy configuration looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "cachet.toml";

pub mod config;
pub mod coordinate;
pub mod notation;
