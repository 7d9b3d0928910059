//! The resolution strategy: forced modules, conflict mode, user
//! dependency-resolve actions and the cache policy, configured once and then
//! consulted throughout resolution.

use std::fmt;
use std::sync::Arc;

use cachet_core::coordinate::ModuleVersionSelector;
use cachet_core::notation::{parse_notations, ModuleNotation};
use cachet_util::time::TimeUnit;

use crate::cache_policy::CachePolicy;
use crate::conflict::ConflictResolution;
use crate::details::{
    forcing_action, DependencyResolveAction, DependencyResolveDetails, ResolveAction,
};

/// Per-configuration resolution settings.
///
/// Mutating methods are meant for configuration time only; once resolution
/// starts the strategy is shared read-only across lookups.
#[derive(Clone, Default)]
pub struct ResolutionStrategy {
    forced_modules: Vec<ModuleVersionSelector>,
    dependency_resolve_actions: Vec<ResolveAction>,
    conflict_resolution: ConflictResolution,
    cache_policy: CachePolicy,
}

impl ResolutionStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forced modules in the order they were first forced.
    pub fn forced_modules(&self) -> &[ModuleVersionSelector] {
        &self.forced_modules
    }

    /// Add forced modules to those already forced. Nothing is added unless
    /// every notation parses.
    pub fn force<I>(&mut self, notations: I) -> miette::Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<ModuleNotation>,
    {
        for selector in parse_notations(notations)? {
            if !self.forced_modules.contains(&selector) {
                self.forced_modules.push(selector);
            }
        }
        Ok(self)
    }

    /// Replace the forced modules wholesale.
    pub fn set_forced_modules<I>(&mut self, notations: I) -> miette::Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<ModuleNotation>,
    {
        self.forced_modules = parse_notations(notations)?;
        Ok(self)
    }

    /// Fail resolution when a module is requested at conflicting versions.
    pub fn fail_on_version_conflict(&mut self) -> &mut Self {
        self.conflict_resolution = ConflictResolution::Strict;
        self
    }

    pub fn conflict_resolution(&self) -> ConflictResolution {
        self.conflict_resolution
    }

    /// Append an action run on every dependency request, after forcing and
    /// after every action registered before it.
    pub fn each_dependency<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut DependencyResolveDetails) -> miette::Result<()> + Send + Sync + 'static,
    {
        self.dependency_resolve_actions.push(Arc::new(action));
        self
    }

    pub fn dependency_resolve_action_count(&self) -> usize {
        self.dependency_resolve_actions.len()
    }

    /// The pipeline applied to every dependency request: forcing first, then
    /// user actions in registration order. A user action may override a
    /// forced version.
    pub fn dependency_resolve_action(&self) -> DependencyResolveAction {
        let mut actions = Vec::with_capacity(self.dependency_resolve_actions.len() + 1);
        actions.push(forcing_action(&self.forced_modules));
        actions.extend(self.dependency_resolve_actions.iter().cloned());
        DependencyResolveAction::new(actions)
    }

    pub fn cache_policy(&self) -> &CachePolicy {
        &self.cache_policy
    }

    /// Mutable access to the cache policy for registering `each_*` rules.
    pub fn resolution_rules(&mut self) -> &mut CachePolicy {
        &mut self.cache_policy
    }

    pub fn cache_dynamic_versions_for(&mut self, value: u64, unit: TimeUnit) -> &mut Self {
        self.cache_policy.cache_dynamic_versions_for(value, unit);
        self
    }

    /// Like [`Self::cache_dynamic_versions_for`] with a unit name such as
    /// `"minutes"`.
    pub fn cache_dynamic_versions_for_units(
        &mut self,
        value: u64,
        units: &str,
    ) -> miette::Result<&mut Self> {
        let unit: TimeUnit = units.parse()?;
        Ok(self.cache_dynamic_versions_for(value, unit))
    }

    pub fn cache_changing_modules_for(&mut self, value: u64, unit: TimeUnit) -> &mut Self {
        self.cache_policy.cache_changing_modules_for(value, unit);
        self
    }

    /// Like [`Self::cache_changing_modules_for`] with a unit name such as
    /// `"hours"`.
    pub fn cache_changing_modules_for_units(
        &mut self,
        value: u64,
        units: &str,
    ) -> miette::Result<&mut Self> {
        let unit: TimeUnit = units.parse()?;
        Ok(self.cache_changing_modules_for(value, unit))
    }
}

impl fmt::Debug for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionStrategy")
            .field("forced_modules", &self.forced_modules)
            .field(
                "dependency_resolve_actions",
                &self.dependency_resolve_actions.len(),
            )
            .field("conflict_resolution", &self.conflict_resolution)
            .field("cache_policy", &self.cache_policy)
            .finish()
    }
}
