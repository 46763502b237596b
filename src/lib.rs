pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::RecommendError;
pub use models::*;
pub use services::recommendation::{BuildOutcome, RecommendationService};
pub use services::store::InMemoryStore;

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<InMemoryStore>,
    pub recommendation_service: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(Self::load_store(&config)?);
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<InMemoryStore>) -> Self {
        let recommendation_service = Arc::new(RecommendationService::new(
            store.clone(),
            store.clone(),
            config.recommender.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            recommendation_service,
        }
    }

    fn load_store(config: &Config) -> Result<InMemoryStore> {
        if let Some(path) = &config.data.dataset_path {
            if std::path::Path::new(path).exists() {
                return InMemoryStore::load_json(path);
            }
            warn!("Dataset {} not found", path);
        }

        if !config.data.generate_if_missing {
            info!("Starting with an empty store");
            return Ok(InMemoryStore::new());
        }

        info!(
            "Generating synthetic dataset with {} users and {} items",
            config.seed.users, config.seed.items
        );
        let mut rng = services::store::seed::rng_from_seed(config.seed.rng_seed);
        InMemoryStore::from_dataset(services::store::seed::generate_dataset(&config.seed, &mut rng))
    }

    /// Runs the startup build on the blocking pool. A panic inside the build
    /// is logged and the caller carries on.
    pub async fn prime_cache(&self) {
        let service = self.recommendation_service.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || service.prime_on_startup()).await {
            error!("Cache priming task did not complete: {}", e);
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
