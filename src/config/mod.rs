use crate::algorithms::DEFAULT_POSITIVE_THRESHOLD;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub recommender: RecommenderConfig,
    pub data: DataConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub default_count: usize,
    pub max_count: usize,
    pub positive_threshold: f64,
    pub prime_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dataset_path: Option<String>,
    pub generate_if_missing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub users: usize,
    pub items: usize,
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: num_cpus::get(),
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_count: 10,
            max_count: 100,
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            prime_on_startup: true,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            generate_if_missing: true,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 15,
            items: 20,
            rng_seed: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        Self::build(config::File::with_name(path))
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(path).exists() {
            tracing::info!("Config file {} not found, using defaults and environment", path);
        }

        let config = Self::build(config::File::with_name(path).required(false))?;
        config.validate()?;
        Ok(config)
    }

    fn build<S>(file: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ENGAGEREC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be non-zero"));
        }
        if self.server.workers == 0 {
            return Err(anyhow!("server.workers must be at least 1"));
        }
        if self.recommender.default_count > self.recommender.max_count {
            return Err(anyhow!(
                "recommender.default_count ({}) exceeds recommender.max_count ({})",
                self.recommender.default_count,
                self.recommender.max_count
            ));
        }
        let threshold = self.recommender.positive_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(anyhow!("recommender.positive_threshold must be a finite, non-negative number"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recommender.default_count, 10);
        assert_eq!(config.recommender.positive_threshold, 0.1);
        assert!(config.server.socket_addr().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.recommender.default_count = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.recommender.positive_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.data.generate_if_missing);
    }

    #[test]
    fn test_environment_applies_without_file() {
        std::env::set_var("ENGAGEREC_SEED__USERS", "42");
        let config = Config::load("does/not/exist/either.toml");
        std::env::remove_var("ENGAGEREC_SEED__USERS");

        let config = config.unwrap();
        assert_eq!(config.seed.users, 42);
        assert_eq!(config.seed.items, 20);
    }
}
