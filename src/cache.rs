//! Caching of built group indexes
//!
//! Rebuilding a [`GroupIndex`] is linear in the number of enabled phrases, but
//! the settings screen mutates the store far less often than texts are
//! scanned. [`IndexCache`] keeps the last built index and only rebuilds when
//! the store version moved.
//!
//! ## Usage Examples
//!
//! ```rust
//! use ingredient_scanner::cache::{create_shared_store, IndexCache};
//! use ingredient_scanner::group_store::GroupStore;
//!
//! let store = create_shared_store(GroupStore::with_default_groups()?);
//! let cache = IndexCache::new();
//!
//! let first = cache.get_or_build_shared(&store);
//! let second = cache.get_or_build_shared(&store);
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! # Ok::<(), ingredient_scanner::errors::AppError>(())
//! ```

use crate::group_index::GroupIndex;
use crate::group_store::GroupStore;
use crate::observability::record_index_cache_lookup;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

/// Single-writer handle to a group store shared across threads
pub type SharedGroupStore = Arc<RwLock<GroupStore>>;

/// Wrap a store for shared use
pub fn create_shared_store(store: GroupStore) -> SharedGroupStore {
    Arc::new(RwLock::new(store))
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Lookups answered by the cached index
    pub hits: u64,
    /// Lookups that required a build
    pub misses: u64,
    /// Builds that replaced an existing, stale index
    pub rebuilds: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

#[derive(Debug, Default)]
struct CacheState {
    index: Option<Arc<GroupIndex>>,
    stats: CacheStats,
}

/// Version-keyed cache of the last built group index
#[derive(Debug, Default)]
pub struct IndexCache {
    state: Mutex<CacheState>,
}

impl IndexCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an index current with `store`, building one if needed
    pub fn get_or_build(&self, store: &GroupStore) -> Arc<GroupIndex> {
        let mut state = self.state.lock();

        let cached = state
            .index
            .as_ref()
            .filter(|index| store.is_current(index))
            .cloned();
        if let Some(index) = cached {
            state.stats.hits += 1;
            update_hit_rate(&mut state.stats);
            record_index_cache_lookup(true);
            return index;
        }

        let had_index = state.index.is_some();
        let index = Arc::new(store.build_index());
        state.index = Some(Arc::clone(&index));
        state.stats.misses += 1;
        if had_index {
            state.stats.rebuilds += 1;
        }
        update_hit_rate(&mut state.stats);
        record_index_cache_lookup(false);
        debug!(version = store.version(), rebuilt = had_index, "Group index cache refreshed");

        index
    }

    /// Same as [`IndexCache::get_or_build`], taking the store's read lock
    pub fn get_or_build_shared(&self, store: &SharedGroupStore) -> Arc<GroupIndex> {
        let guard = store.read();
        self.get_or_build(&guard)
    }

    /// Drop the cached index
    pub fn invalidate(&self) {
        self.state.lock().index = None;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats.clone()
    }
}

fn update_hit_rate(stats: &mut CacheStats) {
    let total = stats.hits + stats.misses;
    stats.hit_rate = if total > 0 {
        stats.hits as f64 / total as f64
    } else {
        0.0
    };
}
