//! Dependency-resolve details and the action pipeline applied to every
//! dependency request before it is resolved.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cachet_core::coordinate::ModuleVersionSelector;

/// A user action inspecting or rewriting one dependency request.
pub type ResolveAction =
    Arc<dyn Fn(&mut DependencyResolveDetails) -> miette::Result<()> + Send + Sync>;

/// One dependency request on its way into graph resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyResolveDetails {
    requested: ModuleVersionSelector,
    target: ModuleVersionSelector,
}

impl DependencyResolveDetails {
    pub fn new(requested: ModuleVersionSelector) -> Self {
        Self {
            target: requested.clone(),
            requested,
        }
    }

    /// The selector as originally declared.
    pub fn requested(&self) -> &ModuleVersionSelector {
        &self.requested
    }

    /// The selector resolution will use, after earlier actions ran.
    pub fn target(&self) -> &ModuleVersionSelector {
        &self.target
    }

    /// Resolve this dependency at `version` instead.
    pub fn use_version(&mut self, version: impl Into<String>) {
        self.target.version = version.into();
    }

    pub fn is_rewritten(&self) -> bool {
        self.target != self.requested
    }

    pub fn into_target(self) -> ModuleVersionSelector {
        self.target
    }
}

/// Composite of the forcing action followed by user actions, in order.
#[derive(Clone)]
pub struct DependencyResolveAction {
    actions: Vec<ResolveAction>,
}

impl DependencyResolveAction {
    pub(crate) fn new(actions: Vec<ResolveAction>) -> Self {
        Self { actions }
    }

    /// Run every action against `details`, stopping at the first error.
    pub fn execute(&self, details: &mut DependencyResolveDetails) -> miette::Result<()> {
        for action in &self.actions {
            action(details)?;
        }
        if details.is_rewritten() {
            tracing::debug!("{} resolved as {}", details.requested, details.target);
        }
        Ok(())
    }

    /// Convenience: run the pipeline on a fresh request and return the target.
    pub fn apply(&self, requested: &ModuleVersionSelector) -> miette::Result<ModuleVersionSelector> {
        let mut details = DependencyResolveDetails::new(requested.clone());
        self.execute(&mut details)?;
        Ok(details.into_target())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for DependencyResolveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyResolveAction")
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// Build the action pinning every forced module to its forced version.
///
/// When several selectors force the same module, the last one wins.
pub(crate) fn forcing_action(forced: &[ModuleVersionSelector]) -> ResolveAction {
    let mut versions: HashMap<(String, String), String> = HashMap::new();
    for selector in forced {
        let key = (selector.group.clone(), selector.name.clone());
        if let Some(previous) = versions.insert(key, selector.version.clone()) {
            if previous != selector.version {
                tracing::warn!(
                    "{} is forced more than once; using {} over {previous}",
                    selector.module_key(),
                    selector.version
                );
            }
        }
    }
    Arc::new(move |details: &mut DependencyResolveDetails| -> miette::Result<()> {
        let key = (
            details.requested.group.clone(),
            details.requested.name.clone(),
        );
        if let Some(version) = versions.get(&key) {
            details.use_version(version.clone());
        }
        Ok(())
    })
}
