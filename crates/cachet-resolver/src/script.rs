//! Rhai conditions for rules and resolve actions declared in `cachet.toml`.
//!
//! Expressions are compiled once when the strategy is configured, so syntax
//! errors surface before resolution starts. Each evaluation gets a fresh
//! scope holding the variables of the entry under evaluation.

use std::fmt;
use std::sync::Arc;

use rhai::{Engine, Scope, AST};

use cachet_util::errors::CachetError;

use crate::control::{ArtifactControl, DependencyControl, ModuleControl, ResolutionControl};
use crate::details::DependencyResolveDetails;

/// Build the engine shared by every condition of one strategy.
pub fn engine() -> Arc<Engine> {
    let mut engine = Engine::new();
    engine.set_max_operations(10_000);
    Arc::new(engine)
}

/// Values a condition can refer to by name.
pub trait ScriptVariables {
    fn push_variables(&self, scope: &mut Scope<'_>);
}

/// A compiled boolean expression.
#[derive(Clone)]
pub struct ScriptCondition {
    expression: String,
    ast: AST,
    engine: Arc<Engine>,
}

impl ScriptCondition {
    pub fn compile(engine: &Arc<Engine>, expression: &str) -> miette::Result<Self> {
        let ast = engine
            .compile_expression(expression)
            .map_err(|e| CachetError::Script {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            expression: expression.to_string(),
            ast,
            engine: Arc::clone(engine),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluate against `subject`. Evaluation failures and non-boolean
    /// results are errors.
    pub fn matches<T: ScriptVariables + ?Sized>(&self, subject: &T) -> miette::Result<bool> {
        let mut scope = Scope::new();
        subject.push_variables(&mut scope);
        let matched = self
            .engine
            .eval_ast_with_scope::<bool>(&mut scope, &self.ast)
            .map_err(|e| CachetError::Script {
                expression: self.expression.clone(),
                message: e.to_string(),
            })?;
        Ok(matched)
    }
}

impl fmt::Debug for ScriptCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScriptCondition")
            .field(&self.expression)
            .finish()
    }
}

fn int(millis: u64) -> i64 {
    i64::try_from(millis).unwrap_or(i64::MAX)
}

impl ScriptVariables for DependencyControl {
    fn push_variables(&self, scope: &mut Scope<'_>) {
        let request = self.request();
        scope
            .push_constant("group", request.group.clone())
            .push_constant("name", request.name.clone())
            .push_constant("version", request.version.clone())
            .push_constant(
                "resolved_version",
                self.cached_result()
                    .map(|id| id.version.clone())
                    .unwrap_or_default(),
            )
            .push_constant("cached", self.cached_result().is_some())
            .push_constant("age_millis", int(self.age_millis()));
    }
}

impl ScriptVariables for ModuleControl {
    fn push_variables(&self, scope: &mut Scope<'_>) {
        let request = self.request();
        scope
            .push_constant("group", request.group.clone())
            .push_constant("name", request.name.clone())
            .push_constant("version", request.version.clone())
            .push_constant("changing", self.is_changing())
            .push_constant("cached", self.cached_result().is_some())
            .push_constant("age_millis", int(self.age_millis()));
    }
}

impl ScriptVariables for ArtifactControl {
    fn push_variables(&self, scope: &mut Scope<'_>) {
        let artifact = self.request();
        scope
            .push_constant("group", artifact.module.group.clone())
            .push_constant("name", artifact.module.name.clone())
            .push_constant("version", artifact.module.version.clone())
            .push_constant("artifact", artifact.name.clone())
            .push_constant("artifact_type", artifact.kind.clone())
            .push_constant("extension", artifact.extension.clone().unwrap_or_default())
            .push_constant("classifier", artifact.classifier.clone().unwrap_or_default())
            .push_constant("cached", self.cached_result().is_some())
            .push_constant("age_millis", int(self.age_millis()))
            .push_constant("changing_module", self.belongs_to_changing_module())
            .push_constant(
                "descriptor_age_millis",
                int(self.module_descriptor_age_millis()),
            )
            .push_constant("descriptor_in_sync", self.is_module_descriptor_in_sync());
    }
}

impl ScriptVariables for DependencyResolveDetails {
    fn push_variables(&self, scope: &mut Scope<'_>) {
        let requested = self.requested();
        scope
            .push_constant("group", requested.group.clone())
            .push_constant("name", requested.name.clone())
            .push_constant("version", requested.version.clone())
            .push_constant("target_version", self.target().version.clone());
    }
}
