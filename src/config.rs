use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub api_base: String,
    /// Vector dimensionality. Must match the provider's output — the vec0
    /// table is created with this width and ingestion rejects anything else.
    pub dimensions: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum relevance score at which two comments count as similar.
    pub default_threshold: f64,
    /// Candidates requested per nearest-neighbor query.
    pub top_k: usize,
    /// Bound on concurrent nearest-neighbor queries within one analysis.
    pub max_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_commentsim_dir()
            .join("comments.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "text-embedding-ada-002".into(),
            api_base: "https://api.openai.com/v1".into(),
            dimensions: 1536,
            timeout_secs: 30,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.1,
            top_k: 10,
            max_concurrency: 4,
        }
    }
}

/// Returns `~/.commentsim/`
pub fn default_commentsim_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".commentsim")
}

/// Returns the default config file path: `~/.commentsim/config.toml`
pub fn default_config_path() -> PathBuf {
    default_commentsim_dir().join("config.toml")
}

impl Config {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (COMMENTSIM_DB, COMMENTSIM_PORT,
    /// COMMENTSIM_LOG_LEVEL). The embedding API key is read separately at
    /// provider creation (OPENAI_API_KEY) and never lives in the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("COMMENTSIM_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("COMMENTSIM_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("COMMENTSIM_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
