use serde::Deserialize;
use std::path::Path;

use cachet_util::errors::{CachetError, CachetResult};
use cachet_util::time::TimeUnit;

use crate::notation::ModuleNotation;
use crate::CONFIG_FILE_NAME;

/// Resolution strategy configuration loaded from `cachet.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Forced modules, conflict handling and resolve actions from `[resolution]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub force: Vec<ModuleNotation>,
    #[serde(default, rename = "fail-on-version-conflict")]
    pub fail_on_version_conflict: bool,
    #[serde(default, rename = "each-dependency")]
    pub each_dependency: Vec<DependencyActionConfig>,
}

/// A `[[resolution.each-dependency]]` entry rewriting the version of
/// matching dependency requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyActionConfig {
    /// Rhai expression; absent means every dependency.
    #[serde(default)]
    pub when: Option<String>,
    #[serde(rename = "use-version")]
    pub use_version: String,
}

/// Cache TTLs and explicit rules from `[cache]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default, rename = "dynamic-versions")]
    pub dynamic_versions: Option<TtlConfig>,
    #[serde(default, rename = "changing-modules")]
    pub changing_modules: Option<TtlConfig>,
    #[serde(default)]
    pub dependency: Vec<CacheRuleConfig>,
    #[serde(default)]
    pub module: Vec<CacheRuleConfig>,
    #[serde(default)]
    pub artifact: Vec<CacheRuleConfig>,
}

/// A duration written as `{ value = 10, unit = "minutes" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtlConfig {
    pub value: u64,
    pub unit: TimeUnit,
}

impl TtlConfig {
    pub fn to_millis(&self) -> u64 {
        self.unit.to_millis(self.value)
    }
}

/// One explicit cache rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheRuleConfig {
    /// Rhai expression; absent means the rule always applies.
    #[serde(default)]
    pub when: Option<String>,
    pub action: CacheAction,
    /// Required when `action = "cache-for"`.
    #[serde(default)]
    pub ttl: Option<TtlConfig>,
}

/// What a matching cache rule decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheAction {
    Refresh,
    UseCached,
    CacheFor,
}

impl CacheRuleConfig {
    /// Reject a `cache-for` rule without a TTL, or a TTL on any other action.
    pub fn validate(&self) -> Result<(), CachetError> {
        match (self.action, self.ttl) {
            (CacheAction::CacheFor, None) => Err(CachetError::Config {
                message: "cache rule with action 'cache-for' needs a ttl".to_string(),
            }),
            (CacheAction::Refresh | CacheAction::UseCached, Some(_)) => Err(CachetError::Config {
                message: "ttl is only allowed with action 'cache-for'".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl StrategyConfig {
    /// Parse a configuration from TOML text.
    pub fn parse_toml(content: &str) -> CachetResult<Self> {
        let config: StrategyConfig = toml::from_str(content).map_err(|e| CachetError::Config {
            message: format!("Failed to parse {CONFIG_FILE_NAME}: {e}"),
        })?;
        for rule in config
            .cache
            .dependency
            .iter()
            .chain(&config.cache.module)
            .chain(&config.cache.artifact)
        {
            rule.validate()?;
        }
        Ok(config)
    }

    /// Load and parse a configuration file.
    pub fn from_path(path: &Path) -> CachetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CachetError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded strategy configuration from {}", path.display());
        Self::parse_toml(&content)
    }

    /// Load `cachet.toml` from `dir`, or return defaults if the file doesn't exist.
    pub fn load(dir: &Path) -> CachetResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }
}
