//! Cache policy: three rule chains deciding whether cached dependency
//! versions, module descriptors and artifacts must be revalidated.
//!
//! Each chain evaluates user rules newest-first, then the built-in defaults.
//! Evaluation stops at the first rule returning a terminal verdict; when no
//! rule decides, the cached value is reused.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use cachet_core::coordinate::{
    ArtifactIdentifier, ModuleVersionIdentifier, ModuleVersionSelector, ResolvedModuleVersion,
};
use cachet_util::time::TimeUnit;

use crate::control::{
    ArtifactControl, DependencyControl, ModuleControl, ResolutionControl, Verdict,
};

const SECONDS_IN_DAY: u64 = 24 * 60 * 60;

/// A cache rule: inspects a control and returns a verdict. An `Err` aborts
/// the query and is returned to the caller unchanged.
pub type CacheRule<C> = Arc<dyn Fn(&C) -> miette::Result<Verdict> + Send + Sync>;

/// An ordered chain of cache rules for one kind of control.
pub struct RuleChain<C> {
    /// Registered rules, oldest first. Evaluated in reverse.
    rules: Vec<CacheRule<C>>,
    /// Built-in rules, in evaluation order, consulted after every registered rule.
    defaults: Vec<CacheRule<C>>,
}

impl<C> RuleChain<C> {
    fn with_defaults(defaults: Vec<CacheRule<C>>) -> Self {
        Self {
            rules: Vec::new(),
            defaults,
        }
    }

    /// Register a rule ahead of every rule registered before it.
    pub fn push<F>(&mut self, rule: F)
    where
        F: Fn(&C) -> miette::Result<Verdict> + Send + Sync + 'static,
    {
        self.rules.push(rule_arc(rule));
    }

    /// Number of rules, built-in defaults included.
    pub fn len(&self) -> usize {
        self.rules.len() + self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rules registered after construction.
    pub fn registered_len(&self) -> usize {
        self.rules.len()
    }

    /// Walk the chain and return the first terminal verdict, or
    /// [`Verdict::Decline`] if every rule declined.
    pub fn evaluate(&self, control: &C) -> miette::Result<Verdict> {
        let chain = self.rules.iter().rev().chain(self.defaults.iter());
        for (position, rule) in chain.enumerate() {
            let verdict = rule(control)?;
            if !verdict.is_decline() {
                tracing::trace!("cache rule #{position} matched: {verdict}");
                return Ok(verdict);
            }
        }
        Ok(Verdict::Decline)
    }
}

fn rule_arc<C, F>(rule: F) -> CacheRule<C>
where
    F: Fn(&C) -> miette::Result<Verdict> + Send + Sync + 'static,
{
    Arc::new(rule)
}

impl<C> Clone for RuleChain<C> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

impl<C> fmt::Debug for RuleChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("registered", &self.rules.len())
            .field("defaults", &self.defaults.len())
            .finish()
    }
}

/// Decides, per cached entry, whether resolution must go back to the repository.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    dependency_rules: RuleChain<DependencyControl>,
    module_rules: RuleChain<ModuleControl>,
    artifact_rules: RuleChain<ArtifactControl>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl CachePolicy {
    /// A policy with the built-in defaults:
    ///
    /// - dynamic versions are cached for a day;
    /// - changing modules are cached for a day;
    /// - missing modules and artifacts are cached for a day;
    /// - artifacts of a changing module whose descriptor was just resolved are
    ///   refreshed, unless the artifact was resolved in this invocation too;
    /// - artifacts whose descriptor hash no longer matches are always refreshed.
    pub fn new() -> Self {
        Self {
            dependency_rules: RuleChain::with_defaults(vec![rule_arc(cache_dynamic_versions(
                SECONDS_IN_DAY,
                TimeUnit::Seconds,
            ))]),
            module_rules: RuleChain::with_defaults(vec![
                rule_arc(cache_missing_modules(SECONDS_IN_DAY, TimeUnit::Seconds)),
                rule_arc(cache_changing_modules(SECONDS_IN_DAY, TimeUnit::Seconds)),
            ]),
            artifact_rules: RuleChain::with_defaults(vec![
                rule_arc(refresh_artifact_for_non_matching_descriptor),
                rule_arc(refresh_artifact_for_changing_module),
                rule_arc(cache_missing_artifacts(SECONDS_IN_DAY, TimeUnit::Seconds)),
            ]),
        }
    }

    /// Register a rule for dynamic version lookups, evaluated before all
    /// earlier rules.
    pub fn each_dependency<F>(&mut self, rule: F) -> &mut Self
    where
        F: Fn(&DependencyControl) -> miette::Result<Verdict> + Send + Sync + 'static,
    {
        self.dependency_rules.push(rule);
        self
    }

    /// Register a rule for module descriptor lookups, evaluated before all
    /// earlier rules.
    pub fn each_module<F>(&mut self, rule: F) -> &mut Self
    where
        F: Fn(&ModuleControl) -> miette::Result<Verdict> + Send + Sync + 'static,
    {
        self.module_rules.push(rule);
        self
    }

    /// Register a rule for artifact lookups, evaluated before all earlier rules.
    pub fn each_artifact<F>(&mut self, rule: F) -> &mut Self
    where
        F: Fn(&ArtifactControl) -> miette::Result<Verdict> + Send + Sync + 'static,
    {
        self.artifact_rules.push(rule);
        self
    }

    /// Cache every dynamic version resolution for the given duration.
    pub fn cache_dynamic_versions_for(&mut self, value: u64, unit: TimeUnit) -> &mut Self {
        self.each_dependency(cache_dynamic_versions(value, unit))
    }

    /// Cache changing module descriptors for the given duration.
    pub fn cache_changing_modules_for(&mut self, value: u64, unit: TimeUnit) -> &mut Self {
        self.each_module(cache_changing_modules(value, unit))
    }

    pub fn dependency_rules(&self) -> &RuleChain<DependencyControl> {
        &self.dependency_rules
    }

    pub fn module_rules(&self) -> &RuleChain<ModuleControl> {
        &self.module_rules
    }

    pub fn artifact_rules(&self) -> &RuleChain<ArtifactControl> {
        &self.artifact_rules
    }

    pub fn dependency_verdict(&self, control: &DependencyControl) -> miette::Result<Verdict> {
        self.dependency_rules.evaluate(control)
    }

    pub fn module_verdict(&self, control: &ModuleControl) -> miette::Result<Verdict> {
        self.module_rules.evaluate(control)
    }

    pub fn artifact_verdict(&self, control: &ArtifactControl) -> miette::Result<Verdict> {
        self.artifact_rules.evaluate(control)
    }

    /// Whether a dynamic version `selector`, last resolved to `module_id`
    /// `age_millis` ago, must be resolved again.
    pub fn must_refresh_dynamic_version(
        &self,
        selector: &ModuleVersionSelector,
        module_id: &ModuleVersionIdentifier,
        age_millis: u64,
    ) -> miette::Result<bool> {
        let control = DependencyControl::new(selector.clone(), module_id.clone(), age_millis);
        let verdict = self.dependency_verdict(&control)?;
        Ok(settle(selector, verdict))
    }

    /// Whether a non-changing module's cached descriptor must be refreshed.
    /// `cached` is `None` when the cache recorded the module as missing.
    pub fn must_refresh_module(
        &self,
        module_id: &ModuleVersionIdentifier,
        cached: Option<&ResolvedModuleVersion>,
        age_millis: u64,
    ) -> miette::Result<bool> {
        self.must_refresh_module_with(module_id, cached, age_millis, false)
    }

    /// Whether a changing module's cached descriptor must be refreshed.
    pub fn must_refresh_changing_module(
        &self,
        module_id: &ModuleVersionIdentifier,
        cached: Option<&ResolvedModuleVersion>,
        age_millis: u64,
    ) -> miette::Result<bool> {
        self.must_refresh_module_with(module_id, cached, age_millis, true)
    }

    fn must_refresh_module_with(
        &self,
        module_id: &ModuleVersionIdentifier,
        cached: Option<&ResolvedModuleVersion>,
        age_millis: u64,
        changing: bool,
    ) -> miette::Result<bool> {
        let control = ModuleControl::new(module_id.clone(), cached.cloned(), changing, age_millis);
        let verdict = self.module_verdict(&control)?;
        Ok(settle(module_id, verdict))
    }

    /// Whether a cached artifact must be downloaded again.
    ///
    /// `age_millis` is the artifact's own age; zero means it was already
    /// resolved earlier in this invocation.
    pub fn must_refresh_artifact(
        &self,
        artifact: &ArtifactIdentifier,
        cached_file: Option<&Path>,
        age_millis: u64,
        belongs_to_changing_module: bool,
        module_descriptor_age_millis: u64,
        module_descriptor_in_sync: bool,
    ) -> miette::Result<bool> {
        let control = ArtifactControl::new(
            artifact.clone(),
            cached_file.map(Path::to_path_buf),
            age_millis,
            belongs_to_changing_module,
            module_descriptor_age_millis,
            module_descriptor_in_sync,
        );
        let verdict = self.artifact_verdict(&control)?;
        Ok(settle(artifact, verdict))
    }
}

/// Collapse a chain verdict into "must refresh"; a fully declined chain keeps
/// the cached value.
fn settle(subject: &dyn fmt::Display, verdict: Verdict) -> bool {
    let refresh = verdict.must_refresh().unwrap_or(false);
    tracing::debug!("{subject}: {verdict}, refresh={refresh}");
    refresh
}

fn cache_dynamic_versions(
    value: u64,
    unit: TimeUnit,
) -> impl Fn(&DependencyControl) -> miette::Result<Verdict> + Send + Sync + 'static {
    move |control: &DependencyControl| -> miette::Result<Verdict> {
        Ok(control.cache_for(value, unit))
    }
}

fn cache_changing_modules(
    value: u64,
    unit: TimeUnit,
) -> impl Fn(&ModuleControl) -> miette::Result<Verdict> + Send + Sync + 'static {
    move |control: &ModuleControl| -> miette::Result<Verdict> {
        Ok(if control.is_changing() {
            control.cache_for(value, unit)
        } else {
            Verdict::Decline
        })
    }
}

fn cache_missing_modules(
    value: u64,
    unit: TimeUnit,
) -> impl Fn(&ModuleControl) -> miette::Result<Verdict> + Send + Sync + 'static {
    move |control: &ModuleControl| -> miette::Result<Verdict> {
        Ok(match control.cached_result() {
            None => control.cache_for(value, unit),
            Some(_) => Verdict::Decline,
        })
    }
}

fn cache_missing_artifacts(
    value: u64,
    unit: TimeUnit,
) -> impl Fn(&ArtifactControl) -> miette::Result<Verdict> + Send + Sync + 'static {
    move |control: &ArtifactControl| -> miette::Result<Verdict> {
        Ok(match control.cached_result() {
            None => control.cache_for(value, unit),
            Some(_) => Verdict::Decline,
        })
    }
}

fn refresh_artifact_for_changing_module(control: &ArtifactControl) -> miette::Result<Verdict> {
    // A zero artifact age means it was already fetched in this invocation.
    let descriptor_just_resolved =
        control.belongs_to_changing_module() && control.module_descriptor_age_millis() == 0;
    Ok(if descriptor_just_resolved && control.age_millis() != 0 {
        control.refresh()
    } else {
        Verdict::Decline
    })
}

fn refresh_artifact_for_non_matching_descriptor(
    control: &ArtifactControl,
) -> miette::Result<Verdict> {
    Ok(if control.is_module_descriptor_in_sync() {
        Verdict::Decline
    } else {
        control.refresh()
    })
}
