//! Per-query resolution controls and the verdicts cache rules return.
//!
//! A control carries everything a rule may inspect about one cached entry:
//! the request, the cached result (if any) and how long ago it was cached.
//! Rules never mutate a control; they return a [`Verdict`], and the rule
//! chain stops at the first verdict that is not [`Verdict::Decline`].

use std::fmt;
use std::path::{Path, PathBuf};

use cachet_core::coordinate::{
    ArtifactIdentifier, ModuleVersionIdentifier, ModuleVersionSelector, ResolvedModuleVersion,
};
use cachet_util::time::TimeUnit;

/// Outcome of evaluating one cache rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The rule does not apply; the next rule is consulted.
    Decline,
    /// The cached value may be reused.
    UseCached,
    /// The cached value must be revalidated against its repository.
    Refresh(RefreshReason),
}

/// Why a rule demanded revalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// The entry outlived the TTL the rule granted.
    Expired { age_millis: u64, ttl_millis: u64 },
    /// The rule refreshes regardless of age.
    Forced,
}

impl Verdict {
    /// Reuse the entry unless it is strictly older than `ttl_millis`.
    ///
    /// An entry exactly at the TTL boundary is still fresh.
    pub fn cache_for(age_millis: u64, ttl_millis: u64) -> Self {
        if age_millis > ttl_millis {
            Verdict::Refresh(RefreshReason::Expired {
                age_millis,
                ttl_millis,
            })
        } else {
            Verdict::UseCached
        }
    }

    /// `Some(must_refresh)` for a terminal verdict, `None` for a decline.
    pub fn must_refresh(&self) -> Option<bool> {
        match self {
            Verdict::Decline => None,
            Verdict::UseCached => Some(false),
            Verdict::Refresh(_) => Some(true),
        }
    }

    pub fn is_decline(&self) -> bool {
        matches!(self, Verdict::Decline)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Decline => write!(f, "decline"),
            Verdict::UseCached => write!(f, "use-cached"),
            Verdict::Refresh(RefreshReason::Forced) => write!(f, "refresh"),
            Verdict::Refresh(RefreshReason::Expired {
                age_millis,
                ttl_millis,
            }) => write!(f, "refresh (age {age_millis}ms > ttl {ttl_millis}ms)"),
        }
    }
}

/// Shared view of a cached entry under evaluation.
///
/// The verdict helpers mirror the three decisions a rule can make; a rule that
/// decides nothing returns [`Verdict::Decline`].
pub trait ResolutionControl {
    type Request;
    type Cached: ?Sized;

    fn request(&self) -> &Self::Request;

    /// The cached result, or `None` when the cache recorded a miss.
    fn cached_result(&self) -> Option<&Self::Cached>;

    /// Milliseconds since the entry was cached.
    fn age_millis(&self) -> u64;

    fn cache_for(&self, value: u64, unit: TimeUnit) -> Verdict {
        Verdict::cache_for(self.age_millis(), unit.to_millis(value))
    }

    fn use_cached_result(&self) -> Verdict {
        Verdict::UseCached
    }

    fn refresh(&self) -> Verdict {
        Verdict::Refresh(RefreshReason::Forced)
    }
}

/// Control for a dynamic version request previously resolved to a concrete module.
#[derive(Debug, Clone)]
pub struct DependencyControl {
    request: ModuleVersionSelector,
    cached: ModuleVersionIdentifier,
    age_millis: u64,
}

impl DependencyControl {
    pub fn new(
        request: ModuleVersionSelector,
        cached: ModuleVersionIdentifier,
        age_millis: u64,
    ) -> Self {
        Self {
            request,
            cached,
            age_millis,
        }
    }
}

impl ResolutionControl for DependencyControl {
    type Request = ModuleVersionSelector;
    type Cached = ModuleVersionIdentifier;

    fn request(&self) -> &ModuleVersionSelector {
        &self.request
    }

    fn cached_result(&self) -> Option<&ModuleVersionIdentifier> {
        Some(&self.cached)
    }

    fn age_millis(&self) -> u64 {
        self.age_millis
    }
}

/// Control for a cached module descriptor.
#[derive(Debug, Clone)]
pub struct ModuleControl {
    request: ModuleVersionIdentifier,
    cached: Option<ResolvedModuleVersion>,
    changing: bool,
    age_millis: u64,
}

impl ModuleControl {
    pub fn new(
        request: ModuleVersionIdentifier,
        cached: Option<ResolvedModuleVersion>,
        changing: bool,
        age_millis: u64,
    ) -> Self {
        Self {
            request,
            cached,
            changing,
            age_millis,
        }
    }

    /// Whether the module may change content without a version bump.
    pub fn is_changing(&self) -> bool {
        self.changing
    }
}

impl ResolutionControl for ModuleControl {
    type Request = ModuleVersionIdentifier;
    type Cached = ResolvedModuleVersion;

    fn request(&self) -> &ModuleVersionIdentifier {
        &self.request
    }

    fn cached_result(&self) -> Option<&ResolvedModuleVersion> {
        self.cached.as_ref()
    }

    fn age_millis(&self) -> u64 {
        self.age_millis
    }
}

/// Control for a cached artifact file.
///
/// `age_millis` is the artifact's own age, distinct from the owning module
/// descriptor's. A zero age also means the artifact was already resolved
/// earlier in this same invocation.
#[derive(Debug, Clone)]
pub struct ArtifactControl {
    request: ArtifactIdentifier,
    cached: Option<PathBuf>,
    age_millis: u64,
    belongs_to_changing_module: bool,
    module_descriptor_age_millis: u64,
    module_descriptor_in_sync: bool,
}

impl ArtifactControl {
    pub fn new(
        request: ArtifactIdentifier,
        cached: Option<PathBuf>,
        age_millis: u64,
        belongs_to_changing_module: bool,
        module_descriptor_age_millis: u64,
        module_descriptor_in_sync: bool,
    ) -> Self {
        Self {
            request,
            cached,
            age_millis,
            belongs_to_changing_module,
            module_descriptor_age_millis,
            module_descriptor_in_sync,
        }
    }

    pub fn belongs_to_changing_module(&self) -> bool {
        self.belongs_to_changing_module
    }

    /// Age of the owning module's descriptor; zero when it was resolved in
    /// this invocation.
    pub fn module_descriptor_age_millis(&self) -> u64 {
        self.module_descriptor_age_millis
    }

    /// Whether the cached descriptor's content hash matches the one recorded
    /// with this artifact.
    pub fn is_module_descriptor_in_sync(&self) -> bool {
        self.module_descriptor_in_sync
    }
}

impl ResolutionControl for ArtifactControl {
    type Request = ArtifactIdentifier;
    type Cached = Path;

    fn request(&self) -> &ArtifactIdentifier {
        &self.request
    }

    fn cached_result(&self) -> Option<&Path> {
        self.cached.as_deref()
    }

    fn age_millis(&self) -> u64 {
        self.age_millis
    }
}
