//! Resolution strategy engine.
//!
//! A [`strategy::ResolutionStrategy`] holds the forced modules, the conflict
//! mode, user dependency-resolve actions and a [`cache_policy::CachePolicy`].
//! The cache policy answers, per cached dependency version, module
//! descriptor or artifact, whether the entry must be revalidated against its
//! repository.

pub mod cache_policy;
pub mod configure;
pub mod conflict;
pub mod control;
pub mod details;
pub mod script;
pub mod strategy;

pub use cache_policy::CachePolicy;
pub use control::{ResolutionControl, Verdict};
pub use strategy::ResolutionStrategy;
