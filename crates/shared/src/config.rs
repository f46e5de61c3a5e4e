//! Configuration management for the catalog.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Schema version stamped on the persisted content cache.
///
/// Bump whenever the shape of the source files changes; a mismatch discards
/// the persisted payload on the next start.
pub const CACHE_VERSION: &str = "2";

/// Data sources loaded at startup, in load order
pub const DEFAULT_SOURCE_FILES: &[&str] = &[
    "anime.json",
    "korean.json",
    "animated.json",
    "bollywood.json",
    "cartoon-data.json",
    "gujarati.json",
    "hollywood.json",
    "horror.json",
    "romance.json",
    "series-data.json",
    "south.json",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Content source settings
    pub sources: SourcesConfig,

    /// Persistent cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Query defaults
    #[serde(default)]
    pub query: QueryConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Where source files are fetched from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Http,
}

/// Content source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Fetch from local files or over HTTP
    pub kind: SourceKind,

    /// Directory holding the source files (relative to data directory or absolute)
    pub dir: String,

    /// Base URL used when `kind = "http"`
    pub base_url: String,

    /// Source file names, in load order
    pub files: Vec<String>,

    /// Field holding the record list when a source is a wrapper object
    pub wrapper_field: String,

    /// Maximum retries for failed HTTP requests
    pub max_retries: u32,

    /// Retry delay in milliseconds (doubled per attempt)
    pub retry_delay_ms: u64,
}

/// Storage backend for the persistent cache
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    File,
    Sqlite,
}

/// Persistent cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable caching
    pub enabled: bool,

    /// Storage backend
    pub backend: CacheBackend,

    /// Cache directory for the file backend (relative to data directory)
    pub cache_dir: String,

    /// Database file for the sqlite backend (relative to data directory)
    pub database: String,

    /// Storage key of the content payload
    pub key: String,

    /// Schema version override; unset follows the build's `CACHE_VERSION`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl CacheConfig {
    /// Version stamp the cache is read and written with
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(CACHE_VERSION)
    }
}

/// Query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Result cap for category queries
    pub category_limit: usize,

    /// Result cap for text search
    pub search_limit: usize,

    /// Result cap for related content
    pub related_limit: usize,

    /// Number of leading records the hero pick is drawn from
    pub hero_pool_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::File,
            cache_dir: "cache".to_string(),
            database: "catalog.db".to_string(),
            key: "content_cache".to_string(),
            version: None,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            category_limit: 50,
            search_limit: 50,
            related_limit: 9,
            hero_pool_size: 50,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::File,
            dir: "jsons".to_string(),
            base_url: "http://localhost:8000/jsons".to_string(),
            files: DEFAULT_SOURCE_FILES.iter().map(|f| f.to_string()).collect(),
            wrapper_field: "movies".to_string(),
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: false,
                json_format: false,
            },
            sources: SourcesConfig::default(),
            cache: CacheConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the absolute path for the source directory
    pub fn sources_dir(&self) -> PathBuf {
        self.resolve(&self.sources.dir)
    }

    /// Get the absolute path for the file cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.resolve(&self.cache.cache_dir)
    }

    /// Get the absolute path for the cache database file
    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.cache.database)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
