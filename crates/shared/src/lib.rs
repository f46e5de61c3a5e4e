//! Shared library for the catalog workspace.
//!
//! This crate provides common functionality used by the catalog core and CLI:
//! - Configuration management
//! - Content record and cache envelope models
//! - SQLite connection wrapper
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{CacheBackend, Config, QueryConfig, SourceKind, CACHE_VERSION};
pub use db::Database;
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
