use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested module coordinate: group, name and a version expression
/// that may be dynamic (`1.+`, `[1.0,2.0)`, `latest.release`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleVersionSelector {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleVersionSelector {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:name:version"` into a selector.
    pub fn parse(s: &str) -> Option<Self> {
        let (group, name, version) = split_coordinate(s)?;
        Some(Self::new(group, name, version))
    }

    /// `group:name` without the version.
    pub fn module_key(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }
}

impl fmt::Display for ModuleVersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// A concrete, resolved module coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleVersionIdentifier {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleVersionIdentifier {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:name:version"` into an identifier.
    pub fn parse(s: &str) -> Option<Self> {
        let (group, name, version) = split_coordinate(s)?;
        Some(Self::new(group, name, version))
    }
}

impl fmt::Display for ModuleVersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Handle to a module version previously resolved and cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedModuleVersion {
    pub id: ModuleVersionIdentifier,
}

impl ResolvedModuleVersion {
    pub fn new(id: ModuleVersionIdentifier) -> Self {
        Self { id }
    }
}

/// One file published by a resolved module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactIdentifier {
    pub module: ModuleVersionIdentifier,
    pub name: String,
    /// Artifact type, e.g. `jar`, `pom`, `aar`.
    pub kind: String,
    pub extension: Option<String>,
    pub classifier: Option<String>,
}

impl ArtifactIdentifier {
    /// The main `jar` artifact of a module, named after the module.
    pub fn jar(module: ModuleVersionIdentifier) -> Self {
        let name = module.name.clone();
        Self {
            module,
            name,
            kind: "jar".to_string(),
            extension: Some("jar".to_string()),
            classifier: None,
        }
    }

    /// File name as laid out in a Maven-style repository.
    pub fn file_name(&self) -> String {
        let ext = self.extension.as_deref().unwrap_or(&self.kind);
        match self.classifier {
            Some(ref c) => format!("{}-{}-{c}.{ext}", self.name, self.module.version),
            None => format!("{}-{}.{ext}", self.name, self.module.version),
        }
    }
}

impl fmt::Display for ArtifactIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file_name(), self.module)
    }
}

fn split_coordinate(s: &str) -> Option<(&str, &str, &str)> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [group, name, version] if parts.iter().all(|p| !p.trim().is_empty()) => {
            Some((group.trim(), name.trim(), version.trim()))
        }
        _ => None,
    }
}
