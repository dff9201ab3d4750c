//! Read-view caching with family-scoped invalidation.
//!
//! A process-local read-through cache for filtered catalog/ledger
//! views. Cached views are grouped into closed [`CacheFamily`] groups;
//! every mutating repository operation invalidates the exact set of
//! families whose served results it could change. Invalidation is
//! deliberately coarse: the whole family is cleared rather than
//! individual keys, trading hit-rate for the guarantee that no stale
//! post-mutation view is ever served.
//!
//! Keys embed the owning organization id (and any user scoping), so a
//! cached view is never served across organizations.

use moka::sync::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default cached views per family.
const DEFAULT_CACHE_CAPACITY: u64 = 512;

/// Default time-to-live for cached views (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// The closed set of cached view groups.
///
/// Each mutating operation names the families it must clear:
///
/// | Mutation | Families invalidated |
/// |---|---|
/// | `set_factor` | `SourcesByCategory`, `FactorById`, `FactorHistory` |
/// | source create/deactivate/delete | `SourcesByCategory`, `FactorById`, `FactorHistory` |
/// | `add_entry` | `EntriesByOrg`, `UnverifiedByOrg`, `EmissionTotals` |
/// | `decide` / `decide_many` / entry delete | `EntriesByOrg`, `UnverifiedByOrg`, `EmissionTotals` |
/// | goal/initiative/progress writes | `GoalsByOrg`, `InitiativesByGoal` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheFamily {
    /// Source listings per category and active flag.
    SourcesByCategory,
    /// Single-source factor lookups.
    FactorById,
    /// Factor change history per source.
    FactorHistory,
    /// Filtered entry listings per organization.
    EntriesByOrg,
    /// The unverified-entries work queue per organization.
    UnverifiedByOrg,
    /// Per-scope and per-year verified totals per organization.
    EmissionTotals,
    /// Goal listings and progress snapshots per organization.
    GoalsByOrg,
    /// Initiative listings and timelines per goal.
    InitiativesByGoal,
}

impl CacheFamily {
    /// All families, for cache construction and full flushes.
    pub const ALL: [Self; 8] = [
        Self::SourcesByCategory,
        Self::FactorById,
        Self::FactorHistory,
        Self::EntriesByOrg,
        Self::UnverifiedByOrg,
        Self::EmissionTotals,
        Self::GoalsByOrg,
        Self::InitiativesByGoal,
    ];

    /// Returns the string representation of the family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SourcesByCategory => "sources_by_category",
            Self::FactorById => "factor_by_id",
            Self::FactorHistory => "factor_history",
            Self::EntriesByOrg => "entries_by_org",
            Self::UnverifiedByOrg => "unverified_by_org",
            Self::EmissionTotals => "emission_totals",
            Self::GoalsByOrg => "goals_by_org",
            Self::InitiativesByGoal => "initiatives_by_goal",
        }
    }
}

/// Process-local cache of computed read views.
///
/// Thread-safe; intended to be created once and injected into every
/// repository so invalidation obligations are explicit at each call
/// site rather than ambient global state.
#[derive(Debug, Clone)]
pub struct ViewCache {
    families: Arc<HashMap<CacheFamily, Cache<String, Arc<serde_json::Value>>>>,
}

impl ViewCache {
    /// Creates a view cache with default capacity and TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a view cache from the application config.
    #[must_use]
    pub fn from_config(config: &carbontrace_shared::config::CacheConfig) -> Self {
        Self::with_config(config.max_capacity, config.ttl_secs)
    }

    /// Creates a view cache with custom per-family capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let families = CacheFamily::ALL
            .iter()
            .map(|family| {
                let cache = Cache::builder()
                    .max_capacity(max_capacity)
                    .time_to_live(Duration::from_secs(ttl_secs))
                    .build();
                (*family, cache)
            })
            .collect();

        Self {
            families: Arc::new(families),
        }
    }

    fn family(&self, family: CacheFamily) -> &Cache<String, Arc<serde_json::Value>> {
        // Every variant is inserted at construction.
        &self.families[&family]
    }

    /// Fetches a cached view, if present and deserializable.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, family: CacheFamily, key: &str) -> Option<T> {
        let value = self.family(family).get(key)?;
        serde_json::from_value((*value).clone()).ok()
    }

    /// Stores a computed view.
    ///
    /// Unserializable values are simply not cached; reads fall through
    /// to the store, which is always correct.
    pub fn put<T: Serialize>(&self, family: CacheFamily, key: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.family(family).insert(key.to_string(), Arc::new(json));
        }
    }

    /// Clears every view in a family.
    pub fn invalidate(&self, family: CacheFamily) {
        self.family(family).invalidate_all();
    }

    /// Clears every view in each named family.
    pub fn invalidate_many(&self, families: &[CacheFamily]) {
        for family in families {
            self.invalidate(*family);
        }
    }

    /// Clears the whole cache.
    pub fn invalidate_all(&self) {
        self.invalidate_many(&CacheFamily::ALL);
    }

    /// Number of views currently cached in a family.
    #[must_use]
    pub fn entry_count(&self, family: CacheFamily) -> u64 {
        self.family(family).entry_count()
    }

    /// Runs moka's deferred maintenance for every family.
    ///
    /// Useful in tests where invalidation must be observed immediately.
    pub fn run_pending_tasks(&self) {
        for cache in self.families.values() {
            cache.run_pending_tasks();
        }
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org_key(org: &str, rest: &str) -> String {
        format!("{org}:{rest}")
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ViewCache::new();
        let key = org_key("org-1", "p=2024");

        assert_eq!(
            cache.get::<Vec<String>>(CacheFamily::EntriesByOrg, &key),
            None
        );

        cache.put(CacheFamily::EntriesByOrg, &key, &vec!["e1".to_string()]);
        assert_eq!(
            cache.get::<Vec<String>>(CacheFamily::EntriesByOrg, &key),
            Some(vec!["e1".to_string()])
        );
    }

    #[test]
    fn test_family_invalidation_clears_whole_family() {
        let cache = ViewCache::new();
        cache.put(CacheFamily::EntriesByOrg, "org-1:a", &1u32);
        cache.put(CacheFamily::EntriesByOrg, "org-1:b", &2u32);
        cache.put(CacheFamily::GoalsByOrg, "org-1:goals", &3u32);

        cache.invalidate(CacheFamily::EntriesByOrg);
        cache.run_pending_tasks();

        assert_eq!(cache.get::<u32>(CacheFamily::EntriesByOrg, "org-1:a"), None);
        assert_eq!(cache.get::<u32>(CacheFamily::EntriesByOrg, "org-1:b"), None);
        // Unrelated family is untouched.
        assert_eq!(
            cache.get::<u32>(CacheFamily::GoalsByOrg, "org-1:goals"),
            Some(3)
        );
    }

    #[test]
    fn test_invalidate_many() {
        let cache = ViewCache::new();
        cache.put(CacheFamily::UnverifiedByOrg, "org-1", &1u32);
        cache.put(CacheFamily::EmissionTotals, "org-1:2024", &2u32);
        cache.put(CacheFamily::FactorById, "src-9", &3u32);

        cache.invalidate_many(&[CacheFamily::UnverifiedByOrg, CacheFamily::EmissionTotals]);
        cache.run_pending_tasks();

        assert_eq!(cache.get::<u32>(CacheFamily::UnverifiedByOrg, "org-1"), None);
        assert_eq!(
            cache.get::<u32>(CacheFamily::EmissionTotals, "org-1:2024"),
            None
        );
        assert_eq!(cache.get::<u32>(CacheFamily::FactorById, "src-9"), Some(3));
    }

    #[test]
    fn test_org_scoped_keys_do_not_collide() {
        let cache = ViewCache::new();
        cache.put(CacheFamily::EntriesByOrg, "org-1:p=*", &vec![1u32, 2]);
        cache.put(CacheFamily::EntriesByOrg, "org-2:p=*", &vec![9u32]);

        assert_eq!(
            cache.get::<Vec<u32>>(CacheFamily::EntriesByOrg, "org-1:p=*"),
            Some(vec![1, 2])
        );
        assert_eq!(
            cache.get::<Vec<u32>>(CacheFamily::EntriesByOrg, "org-2:p=*"),
            Some(vec![9])
        );
    }

    #[test]
    fn test_invalidate_all() {
        let cache = ViewCache::new();
        for family in CacheFamily::ALL {
            cache.put(family, "k", &1u32);
        }
        cache.invalidate_all();
        cache.run_pending_tasks();
        for family in CacheFamily::ALL {
            assert_eq!(cache.get::<u32>(family, "k"), None, "{family:?} not cleared");
        }
    }
}
