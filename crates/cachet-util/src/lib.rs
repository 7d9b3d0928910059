//! Shared utilities for the Cachet resolution-strategy engine.
//!
//! This crate provides cross-cutting concerns used by all other Cachet crates:
//! the unified error type and time-unit handling for cache TTLs and entry ages.

pub mod errors;
pub mod time;
