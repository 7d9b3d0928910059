//! Conflict-resolution mode and version conflict reporting.

use std::collections::BTreeMap;
use std::fmt;

use cachet_core::coordinate::ModuleVersionSelector;
use cachet_util::errors::CachetError;

/// How graph resolution treats several requested versions of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictResolution {
    /// Pick the newest requested version.
    #[default]
    Latest,
    /// Fail the build on any unresolved conflict.
    Strict,
}

impl ConflictResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictResolution::Latest => "latest",
            ConflictResolution::Strict => "strict",
        }
    }

    /// Fail with [`CachetError::VersionConflict`] when strict and `report`
    /// holds conflicts. `Latest` leaves conflicts to graph resolution.
    pub fn enforce(&self, report: &ConflictReport) -> miette::Result<()> {
        match self {
            ConflictResolution::Strict if !report.is_empty() => {
                let modules: Vec<String> = report.conflicts.iter().map(|c| c.to_string()).collect();
                Err(CachetError::VersionConflict {
                    message: modules.join("; "),
                }
                .into())
            }
            ConflictResolution::Strict => Ok(()),
            ConflictResolution::Latest => {
                if !report.is_empty() {
                    tracing::debug!(
                        "{} conflict(s) left to latest-version resolution",
                        report.len()
                    );
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report of all version conflicts among a set of dependency requests.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A module requested at more than one version.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub group: String,
    pub name: String,
    /// Distinct versions, in order of first request.
    pub versions: Vec<String>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `selectors` by module and report every module with more than
    /// one distinct version. Modules are reported in `group:name` order.
    pub fn from_requests<'a, I>(selectors: I) -> Self
    where
        I: IntoIterator<Item = &'a ModuleVersionSelector>,
    {
        let mut by_module: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
        for sel in selectors {
            let versions = by_module
                .entry((sel.group.as_str(), sel.name.as_str()))
                .or_default();
            if !versions.contains(&sel.version.as_str()) {
                versions.push(sel.version.as_str());
            }
        }

        let mut report = Self::new();
        for ((group, name), versions) in by_module {
            if versions.len() > 1 {
                report.add(VersionConflict {
                    group: group.to_string(),
                    name: name.to_string(),
                    versions: versions.into_iter().map(str::to_string).collect(),
                });
            }
        }
        report
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({})",
            self.group,
            self.name,
            self.versions.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> ModuleVersionSelector {
        ModuleVersionSelector::parse(s).unwrap()
    }

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn report_from_requests() {
        let requests = [
            sel("org.example:lib:2.0"),
            sel("org.example:other:1.0"),
            sel("org.example:lib:1.0"),
            sel("org.example:lib:2.0"),
        ];
        let report = ConflictReport::from_requests(&requests);
        assert_eq!(report.len(), 1);
        assert_eq!(report.conflicts[0].versions, vec!["2.0", "1.0"]);
        let s = report.to_string();
        assert!(s.contains("Version conflicts (1):"));
        assert!(s.contains("org.example:lib (2.0, 1.0)"));
    }

    #[test]
    fn default_mode_is_latest() {
        assert_eq!(ConflictResolution::default(), ConflictResolution::Latest);
        assert_eq!(ConflictResolution::default().to_string(), "latest");
    }

    #[test]
    fn latest_tolerates_conflicts() {
        let requests = [sel("org:a:1.0"), sel("org:a:2.0")];
        let report = ConflictReport::from_requests(&requests);
        assert!(ConflictResolution::Latest.enforce(&report).is_ok());
    }

    #[test]
    fn strict_fails_on_conflicts() {
        let requests = [sel("org:a:1.0"), sel("org:a:2.0")];
        let report = ConflictReport::from_requests(&requests);
        let err = ConflictResolution::Strict.enforce(&report).unwrap_err();
        assert_eq!(err.to_string(), "Version conflict: org:a (1.0, 2.0)");
    }

    #[test]
    fn strict_passes_without_conflicts() {
        let requests = [sel("org:a:1.0"), sel("org:b:2.0")];
        let report = ConflictReport::from_requests(&requests);
        assert!(ConflictResolution::Strict.enforce(&report).is_ok());
    }
}
