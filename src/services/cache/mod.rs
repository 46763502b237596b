use crate::algorithms::{InteractionTable, ItemSimilarity};
use crate::error::{RecommendError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct CacheSnapshot {
    version: u64,
    built_at: DateTime<Utc>,
    table: InteractionTable,
    similarity: ItemSimilarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub version: u64,
    pub built_at: DateTime<Utc>,
    pub users: usize,
    pub items: usize,
    pub similarity_entries: usize,
}

impl CacheSnapshot {
    pub fn new(version: u64, table: InteractionTable, similarity: ItemSimilarity) -> Result<Self> {
        let (rows, cols) = similarity.shape();
        let items = table.items().len();
        if rows != items || cols != items || table.item_count() != items {
            return Err(RecommendError::ShapeMismatch { rows, cols, items });
        }

        Ok(Self {
            version,
            built_at: Utc::now(),
            table,
            similarity,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn table(&self) -> &InteractionTable {
        &self.table
    }

    pub fn similarity(&self) -> &ItemSimilarity {
        &self.similarity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            version: self.version,
            built_at: self.built_at,
            users: self.table.user_count(),
            items: self.table.item_count(),
            similarity_entries: self.similarity.nnz(),
        }
    }
}

/// Readers clone the `Arc` and keep using it while a rebuild swaps in a new one.
#[derive(Debug, Default)]
pub struct RecommendationCache {
    current: RwLock<Option<Arc<CacheSnapshot>>>,
    generation: AtomicU64,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<CacheSnapshot>> {
        self.current.read().clone()
    }

    pub fn is_populated(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn next_version(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn replace(&self, snapshot: CacheSnapshot) -> Arc<CacheSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write() = Some(snapshot.clone());
        snapshot
    }

    pub fn clear(&self) -> bool {
        self.current.write().take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::similarity;
    use crate::models::Interaction;

    fn snapshot(cache: &RecommendationCache, interactions: &[Interaction]) -> CacheSnapshot {
        let table = InteractionTable::from_interactions(interactions).unwrap().unwrap();
        let sim = similarity::compute(&table).unwrap();
        CacheSnapshot::new(cache.next_version(), table, sim).unwrap()
    }

    #[test]
    fn test_replace_and_clear() {
        let cache = RecommendationCache::new();
        assert!(cache.current().is_none());

        let first = cache.replace(snapshot(&cache, &[Interaction::new(1, 1, 1.0)]));
        assert!(cache.is_populated());
        assert_eq!(first.version(), 1);

        let held = cache.current().unwrap();
        let second = cache.replace(snapshot(&cache, &[Interaction::new(1, 2, 1.0)]));
        assert_eq!(second.version(), 2);
        // a reader keeps its old snapshot across the swap
        assert_eq!(held.version(), 1);
        assert!(Arc::ptr_eq(&cache.current().unwrap(), &second));

        assert!(cache.clear());
        assert!(!cache.clear());
        assert!(cache.current().is_none());
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let big = InteractionTable::from_interactions(&[
            Interaction::new(1, 1, 1.0),
            Interaction::new(1, 2, 1.0),
        ])
        .unwrap()
        .unwrap();
        let small = InteractionTable::from_interactions(&[Interaction::new(1, 1, 1.0)])
            .unwrap()
            .unwrap();
        let sim = similarity::compute(&small).unwrap();

        let err = CacheSnapshot::new(1, big, sim).unwrap_err();
        assert!(matches!(err, RecommendError::ShapeMismatch { rows: 1, cols: 1, items: 2 }));
    }

    #[test]
    fn test_stats() {
        let cache = RecommendationCache::new();
        let snap = snapshot(
            &cache,
            &[Interaction::new(1, 1, 2.0), Interaction::new(2, 1, 1.0), Interaction::new(2, 2, 1.0)],
        );
        let stats = snap.stats();
        assert_eq!((stats.users, stats.items), (2, 2));
        assert_eq!(stats.similarity_entries, 4);
    }
}
