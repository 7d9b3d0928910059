//! `cachet check`: evaluate one cache query against the configured policy.

use std::path::PathBuf;

use console::style;
use miette::Result;

use cachet_core::coordinate::{
    ArtifactIdentifier, ModuleVersionIdentifier, ModuleVersionSelector, ResolvedModuleVersion,
};
use cachet_resolver::control::{ArtifactControl, DependencyControl, ModuleControl};
use cachet_resolver::{ResolutionStrategy, Verdict};
use cachet_util::errors::CachetError;

use crate::cli::CheckTarget;

pub fn exec(strategy: &ResolutionStrategy, target: CheckTarget) -> Result<()> {
    let policy = strategy.cache_policy();
    let (subject, verdict) = match target {
        CheckTarget::Dependency {
            selector,
            resolved,
            age,
        } => {
            let selector =
                ModuleVersionSelector::parse(&selector).ok_or_else(|| invalid(&selector))?;
            let id = ModuleVersionIdentifier::new(&selector.group, &selector.name, resolved);
            let control = DependencyControl::new(selector.clone(), id, age);
            (selector.to_string(), policy.dependency_verdict(&control)?)
        }
        CheckTarget::Module {
            module,
            age,
            changing,
            missing,
        } => {
            let id = parse_module(&module)?;
            let cached = (!missing).then(|| ResolvedModuleVersion::new(id.clone()));
            let control = ModuleControl::new(id.clone(), cached, changing, age);
            (id.to_string(), policy.module_verdict(&control)?)
        }
        CheckTarget::Artifact {
            module,
            artifact,
            kind,
            extension,
            classifier,
            age,
            missing,
            changing_module,
            descriptor_age,
            descriptor_out_of_sync,
        } => {
            let id = parse_module(&module)?;
            let artifact = ArtifactIdentifier {
                name: artifact.unwrap_or_else(|| id.name.clone()),
                extension: extension.or_else(|| Some(kind.clone())),
                kind,
                classifier,
                module: id,
            };
            let cached = (!missing).then(|| PathBuf::from(artifact.file_name()));
            let control = ArtifactControl::new(
                artifact.clone(),
                cached,
                age,
                changing_module,
                descriptor_age,
                !descriptor_out_of_sync,
            );
            (artifact.to_string(), policy.artifact_verdict(&control)?)
        }
    };

    print_verdict(&subject, verdict);
    Ok(())
}

fn print_verdict(subject: &str, verdict: Verdict) {
    let decision = match verdict.must_refresh() {
        Some(true) => style("refresh").red().bold(),
        Some(false) | None => style("use-cached").green().bold(),
    };
    let reason = if verdict.is_decline() {
        "no rule decided".to_string()
    } else {
        verdict.to_string()
    };
    println!("{decision} {subject} {}", style(format!("({reason})")).dim());
}

fn parse_module(module: &str) -> Result<ModuleVersionIdentifier> {
    Ok(ModuleVersionIdentifier::parse(module).ok_or_else(|| invalid(module))?)
}

fn invalid(notation: &str) -> CachetError {
    CachetError::InvalidNotation {
        notation: notation.to_string(),
        reason: "expected 'group:name:version'".to_string(),
    }
}
