//! Notations accepted when forcing module versions.
//!
//! Users write forced modules as a shorthand string (`"group:name:version"`),
//! a detailed table (`{ group, name, version }`), or pass an already built
//! [`ModuleVersionSelector`]. All of them parse into selectors up front so that
//! malformed input fails during configuration, before any resolution starts.

use serde::Deserialize;

use cachet_util::errors::CachetError;

use crate::coordinate::ModuleVersionSelector;

/// A user-supplied forced-module notation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModuleNotation {
    Short(String),
    Detailed(DetailedNotation),
    #[serde(skip)]
    Selector(ModuleVersionSelector),
}

/// The table form of a forced module.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailedNotation {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleNotation {
    /// Parse this notation into a selector, failing on malformed input.
    pub fn to_selector(&self) -> Result<ModuleVersionSelector, CachetError> {
        match self {
            ModuleNotation::Short(s) => {
                ModuleVersionSelector::parse(s).ok_or_else(|| CachetError::InvalidNotation {
                    notation: s.clone(),
                    reason: "expected 'group:name:version' with non-empty parts".to_string(),
                })
            }
            ModuleNotation::Detailed(d) => {
                let missing: Vec<&str> = [
                    ("group", &d.group),
                    ("name", &d.name),
                    ("version", &d.version),
                ]
                .into_iter()
                .filter(|(_, v)| v.trim().is_empty())
                .map(|(k, _)| k)
                .collect();
                if !missing.is_empty() {
                    return Err(CachetError::InvalidNotation {
                        notation: format!("{}:{}:{}", d.group, d.name, d.version),
                        reason: format!("empty {}", missing.join(", ")),
                    });
                }
                Ok(ModuleVersionSelector::new(
                    d.group.trim(),
                    d.name.trim(),
                    d.version.trim(),
                ))
            }
            ModuleNotation::Selector(s) => Ok(s.clone()),
        }
    }
}

impl From<&str> for ModuleNotation {
    fn from(s: &str) -> Self {
        ModuleNotation::Short(s.to_string())
    }
}

impl From<String> for ModuleNotation {
    fn from(s: String) -> Self {
        ModuleNotation::Short(s)
    }
}

impl From<DetailedNotation> for ModuleNotation {
    fn from(d: DetailedNotation) -> Self {
        ModuleNotation::Detailed(d)
    }
}

impl From<ModuleVersionSelector> for ModuleNotation {
    fn from(s: ModuleVersionSelector) -> Self {
        ModuleNotation::Selector(s)
    }
}

/// Parse every notation, keeping input order and dropping repeated selectors.
///
/// Nothing is returned unless every notation parses.
pub fn parse_notations<I>(notations: I) -> Result<Vec<ModuleVersionSelector>, CachetError>
where
    I: IntoIterator,
    I::Item: Into<ModuleNotation>,
{
    let mut selectors: Vec<ModuleVersionSelector> = Vec::new();
    for notation in notations {
        let selector = notation.into().to_selector()?;
        if !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    Ok(selectors)
}
