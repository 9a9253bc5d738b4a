use crate::error::{NanoIvfError, Result};
use crate::index::ivf_flat::kmeans::KMeansParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexingConfig {
    #[serde(default = "default_nlist")]
    pub default_nlist: usize,
    #[serde(default = "default_nprobe")]
    pub default_nprobe: usize,
    #[serde(default = "default_kmeans_max_iterations")]
    pub kmeans_max_iterations: usize,
    #[serde(default = "default_kmeans_delta_threshold")]
    pub kmeans_delta_threshold: f64,
    /// Seed for centroid initialization. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_nlist() -> usize {
    16
}
fn default_nprobe() -> usize {
    4
}
fn default_kmeans_max_iterations() -> usize {
    25
}
fn default_kmeans_delta_threshold() -> f64 {
    0.01
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            default_nlist: default_nlist(),
            default_nprobe: default_nprobe(),
            kmeans_max_iterations: default_kmeans_max_iterations(),
            kmeans_delta_threshold: default_kmeans_delta_threshold(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl IndexingConfig {
    /// k-means parameters for training `nlist` clusters with this config.
    pub fn kmeans_params(&self, nlist: usize) -> KMeansParams {
        KMeansParams::new(
            nlist,
            self.kmeans_max_iterations,
            self.kmeans_delta_threshold,
        )
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults.
    /// After loading, env var overrides are applied so that:
    /// env var > TOML file > defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    NanoIvfError::Config(format!("failed to read config file {p}: {e}"))
                })?;
                Self::from_toml(&content)?
            }
            None => Config::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| NanoIvfError::Config(format!("failed to parse config: {e}")))
    }

    /// Reject settings that would make every training or search call fail.
    pub fn validate(&self) -> Result<()> {
        let idx = &self.indexing;
        if idx.default_nlist == 0 {
            return Err(NanoIvfError::Config("indexing.default_nlist must be > 0".into()));
        }
        if idx.default_nprobe == 0 {
            return Err(NanoIvfError::Config("indexing.default_nprobe must be > 0".into()));
        }
        if idx.kmeans_max_iterations == 0 {
            return Err(NanoIvfError::Config(
                "indexing.kmeans_max_iterations must be > 0".into(),
            ));
        }
        if !idx.kmeans_delta_threshold.is_finite() {
            return Err(NanoIvfError::Config(
                "indexing.kmeans_delta_threshold must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides on top of file/default values.
    fn apply_env_overrides(&mut self) {
        // Indexing
        if let Some(v) = env_parse("NANOIVF_DEFAULT_NLIST") {
            self.indexing.default_nlist = v;
        }
        if let Some(v) = env_parse("NANOIVF_DEFAULT_NPROBE") {
            self.indexing.default_nprobe = v;
        }
        if let Some(v) = env_parse("NANOIVF_KMEANS_MAX_ITERATIONS") {
            self.indexing.kmeans_max_iterations = v;
        }
        if let Some(v) = env_parse("NANOIVF_KMEANS_DELTA_THRESHOLD") {
            self.indexing.kmeans_delta_threshold = v;
        }
        if let Some(v) = env_parse("NANOIVF_SEED") {
            self.indexing.seed = Some(v);
        }

        // Logging
        if let Ok(v) = std::env::var("NANOIVF_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("NANOIVF_LOG_FORMAT") {
            self.logging.format = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
