use crate::algorithms::{rank_items, similarity, InteractionTable, Ranking};
use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::models::*;
use crate::services::cache::{CacheSnapshot, CacheStats, RecommendationCache};
use crate::services::store::{InteractionSource, ItemCatalog};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum BuildOutcome {
    Built(Arc<CacheSnapshot>),
    Cached(Arc<CacheSnapshot>),
    /// No interaction had a non-zero score; the cache is empty.
    Empty,
    Failed(RecommendError),
}

impl BuildOutcome {
    pub fn snapshot(&self) -> Option<&Arc<CacheSnapshot>> {
        match self {
            BuildOutcome::Built(snapshot) | BuildOutcome::Cached(snapshot) => Some(snapshot),
            BuildOutcome::Empty | BuildOutcome::Failed(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuildOutcome::Built(_) => "built",
            BuildOutcome::Cached(_) => "cached",
            BuildOutcome::Empty => "empty",
            BuildOutcome::Failed(_) => "failed",
        }
    }
}

pub struct RecommendationService {
    interactions: Arc<dyn InteractionSource>,
    catalog: Arc<dyn ItemCatalog>,
    cache: RecommendationCache,
    build_lock: Mutex<()>,
    config: RecommenderConfig,
}

impl RecommendationService {
    pub fn new(
        interactions: Arc<dyn InteractionSource>,
        catalog: Arc<dyn ItemCatalog>,
        config: RecommenderConfig,
    ) -> Self {
        Self {
            interactions,
            catalog,
            cache: RecommendationCache::new(),
            build_lock: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.current().map(|snapshot| snapshot.stats())
    }

    /// On any failure the whole cache is cleared.
    pub fn build(&self, force_rebuild: bool) -> BuildOutcome {
        let _guard = self.build_lock.lock();

        if !force_rebuild {
            if let Some(snapshot) = self.cache.current() {
                debug!("Recommendation cache v{} is populated, skipping build", snapshot.version());
                return BuildOutcome::Cached(snapshot);
            }
        }

        info!("Building recommendation matrices (force_rebuild={})", force_rebuild);

        match self.compute_snapshot() {
            Ok(Some(snapshot)) => {
                let snapshot = self.cache.replace(snapshot);
                info!("Recommendation cache v{} installed", snapshot.version());
                BuildOutcome::Built(snapshot)
            }
            Ok(None) => {
                warn!("No interactions with non-zero scores; recommendations will use the fallback list");
                self.cache.clear();
                BuildOutcome::Empty
            }
            Err(e) => {
                if e.is_computation() {
                    error!("Failed to build recommendation matrices: {}", e);
                } else {
                    warn!("Recommendation data unavailable: {}", e);
                }
                self.cache.clear();
                BuildOutcome::Failed(e)
            }
        }
    }

    fn compute_snapshot(&self) -> Result<Option<CacheSnapshot>> {
        let interactions = self
            .interactions
            .interactions()
            .map_err(|e| RecommendError::DataUnavailable(format!("{:#}", e)))?;

        let Some(table) = InteractionTable::from_interactions(&interactions)? else {
            return Ok(None);
        };
        info!(
            "Interaction table built from {} rows: {} users x {} items",
            interactions.len(),
            table.user_count(),
            table.item_count()
        );

        let similarity = similarity::compute(&table)?;
        info!(
            "Item similarity computed: {}x{} with {} non-zero entries",
            similarity.dim(),
            similarity.dim(),
            similarity.nnz()
        );

        CacheSnapshot::new(self.cache.next_version(), table, similarity).map(Some)
    }

    pub fn recommend(&self, user_id: UserId, count: usize) -> Vec<ItemId> {
        let snapshot = match self.cache.current() {
            Some(snapshot) => Some(snapshot),
            None => {
                info!("Recommendation cache not populated, building before serving user {}", user_id);
                self.build(false).snapshot().cloned()
            }
        };

        let Some(snapshot) = snapshot else {
            warn!("Recommendation data unavailable, serving fallback to user {}", user_id);
            return self.fallback(count);
        };

        match rank_items(
            snapshot.table(),
            snapshot.similarity(),
            user_id,
            count,
            self.config.positive_threshold,
        ) {
            Ranking::Ranked(items) => {
                info!("Generated {} recommendations for user {}", items.len(), user_id);
                items
            }
            Ranking::UnknownUser => {
                info!("User {} not in interaction table, serving fallback", user_id);
                self.fallback(count)
            }
            Ranking::NoPositiveSignal => {
                info!("User {} has no positive interactions, serving fallback", user_id);
                self.fallback(count)
            }
            Ranking::Inconsistent => {
                error!(
                    "Cache v{} is inconsistent for user {} ({} users x {} items), serving fallback",
                    snapshot.version(),
                    user_id,
                    snapshot.table().user_count(),
                    snapshot.table().item_count()
                );
                self.fallback(count)
            }
        }
    }

    pub fn recommend_default(&self, user_id: UserId) -> Vec<ItemId> {
        self.recommend(user_id, self.config.default_count)
    }

    fn fallback(&self, count: usize) -> Vec<ItemId> {
        match self.catalog.recent_items(count) {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to load recent items for fallback: {:#}", e);
                Vec::new()
            }
        }
    }

    pub fn prime_on_startup(&self) {
        info!("Priming recommendation cache on startup");

        match self.build(true) {
            BuildOutcome::Built(snapshot) | BuildOutcome::Cached(snapshot) => {
                let stats = snapshot.stats();
                info!(
                    "Recommendation cache primed: v{} with {} users x {} items",
                    stats.version, stats.users, stats.items
                );
            }
            BuildOutcome::Empty => {
                warn!("Recommendation cache primed empty; serving fallback until interactions exist");
            }
            BuildOutcome::Failed(e) => {
                error!("Failed to prime recommendation cache: {}", e);
            }
        }
    }
}
