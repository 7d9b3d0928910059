//! `cachet show`: summarize the configured resolution strategy.

use console::style;
use miette::Result;
use serde::Serialize;

use cachet_resolver::cache_policy::RuleChain;
use cachet_resolver::ResolutionStrategy;
use cachet_util::errors::CachetError;

#[derive(Serialize)]
struct StrategySummary {
    forced_modules: Vec<String>,
    conflict_resolution: String,
    dependency_resolve_actions: usize,
    cache_rules: CacheRuleSummary,
}

#[derive(Serialize)]
struct CacheRuleSummary {
    dependency: ChainSummary,
    module: ChainSummary,
    artifact: ChainSummary,
}

#[derive(Serialize)]
struct ChainSummary {
    registered: usize,
    total: usize,
}

impl<C> From<&RuleChain<C>> for ChainSummary {
    fn from(chain: &RuleChain<C>) -> Self {
        Self {
            registered: chain.registered_len(),
            total: chain.len(),
        }
    }
}

pub fn exec(strategy: &ResolutionStrategy, json: bool) -> Result<()> {
    let policy = strategy.cache_policy();
    let summary = StrategySummary {
        forced_modules: strategy
            .forced_modules()
            .iter()
            .map(ToString::to_string)
            .collect(),
        conflict_resolution: strategy.conflict_resolution().to_string(),
        dependency_resolve_actions: strategy.dependency_resolve_action_count(),
        cache_rules: CacheRuleSummary {
            dependency: policy.dependency_rules().into(),
            module: policy.module_rules().into(),
            artifact: policy.artifact_rules().into(),
        },
    };

    if json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| CachetError::Generic {
            message: format!("Failed to serialize strategy: {e}"),
        })?;
        println!("{out}");
        return Ok(());
    }

    if summary.forced_modules.is_empty() {
        println!("Forced modules: none");
    } else {
        println!("Forced modules ({}):", summary.forced_modules.len());
        for module in &summary.forced_modules {
            println!("  {}", style(module).cyan());
        }
    }
    println!("Conflict resolution: {}", summary.conflict_resolution);
    println!(
        "Dependency resolve actions: {}",
        summary.dependency_resolve_actions
    );
    println!("Cache rules (registered/total):");
    let rules = &summary.cache_rules;
    for (kind, chain) in [
        ("dependency", &rules.dependency),
        ("module", &rules.module),
        ("artifact", &rules.artifact),
    ] {
        println!("  {kind:<10} {}/{}", chain.registered, chain.total);
    }
    Ok(())
}
