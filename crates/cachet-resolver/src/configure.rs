//! Build a [`ResolutionStrategy`] from a parsed `cachet.toml`.

use std::sync::Arc;

use rhai::Engine;

use cachet_core::config::{CacheAction, CacheRuleConfig, DependencyActionConfig, StrategyConfig};

use crate::control::{
    ArtifactControl, DependencyControl, ModuleControl, ResolutionControl, Verdict,
};
use crate::details::DependencyResolveDetails;
use crate::script::{self, ScriptCondition, ScriptVariables};
use crate::strategy::ResolutionStrategy;

/// The decision a configured cache rule makes once its condition holds.
#[derive(Debug, Clone, Copy)]
enum Decision {
    Refresh,
    UseCached,
    CacheFor { ttl_millis: u64 },
}

impl ResolutionStrategy {
    /// Configure a strategy in file order: forced modules, conflict mode,
    /// resolve actions, TTL shorthands, then dependency, module and artifact
    /// rules. Later rules take precedence over earlier ones.
    pub fn from_config(config: &StrategyConfig) -> miette::Result<Self> {
        let engine = script::engine();
        let mut strategy = Self::new();

        strategy.force(config.resolution.force.iter().cloned())?;
        if config.resolution.fail_on_version_conflict {
            strategy.fail_on_version_conflict();
        }
        for action in &config.resolution.each_dependency {
            strategy.each_dependency(resolve_action(&engine, action)?);
        }

        if let Some(ttl) = config.cache.dynamic_versions {
            strategy.cache_dynamic_versions_for(ttl.value, ttl.unit);
        }
        if let Some(ttl) = config.cache.changing_modules {
            strategy.cache_changing_modules_for(ttl.value, ttl.unit);
        }

        let rules = strategy.resolution_rules();
        for rule in &config.cache.dependency {
            rules.each_dependency(cache_rule::<DependencyControl>(&engine, rule)?);
        }
        for rule in &config.cache.module {
            rules.each_module(cache_rule::<ModuleControl>(&engine, rule)?);
        }
        for rule in &config.cache.artifact {
            rules.each_artifact(cache_rule::<ArtifactControl>(&engine, rule)?);
        }

        tracing::info!(
            "Configured resolution strategy: {} forced module(s), {} conflict resolution, {} resolve action(s)",
            strategy.forced_modules().len(),
            strategy.conflict_resolution(),
            strategy.dependency_resolve_action_count()
        );
        Ok(strategy)
    }
}

fn condition(
    engine: &Arc<Engine>,
    when: Option<&str>,
) -> miette::Result<Option<ScriptCondition>> {
    when.map(|expr| ScriptCondition::compile(engine, expr))
        .transpose()
}

fn cache_rule<C>(
    engine: &Arc<Engine>,
    config: &CacheRuleConfig,
) -> miette::Result<impl Fn(&C) -> miette::Result<Verdict> + Send + Sync + 'static>
where
    C: ResolutionControl + ScriptVariables + 'static,
{
    config.validate()?;
    let decision = match config.action {
        CacheAction::Refresh => Decision::Refresh,
        CacheAction::UseCached => Decision::UseCached,
        CacheAction::CacheFor => Decision::CacheFor {
            ttl_millis: config.ttl.map_or(0, |ttl| ttl.to_millis()),
        },
    };
    let when = condition(engine, config.when.as_deref())?;

    Ok(move |control: &C| -> miette::Result<Verdict> {
        if let Some(ref when) = when {
            if !when.matches(control)? {
                return Ok(Verdict::Decline);
            }
        }
        Ok(match decision {
            Decision::Refresh => control.refresh(),
            Decision::UseCached => control.use_cached_result(),
            Decision::CacheFor { ttl_millis } => {
                Verdict::cache_for(control.age_millis(), ttl_millis)
            }
        })
    })
}

fn resolve_action(
    engine: &Arc<Engine>,
    config: &DependencyActionConfig,
) -> miette::Result<
    impl Fn(&mut DependencyResolveDetails) -> miette::Result<()> + Send + Sync + 'static,
> {
    let when = condition(engine, config.when.as_deref())?;
    let version = config.use_version.clone();

    Ok(move |details: &mut DependencyResolveDetails| -> miette::Result<()> {
        let applies = match when {
            Some(ref when) => when.matches(&*details)?,
            None => true,
        };
        if applies {
            details.use_version(version.clone());
        }
        Ok(())
    })
}
