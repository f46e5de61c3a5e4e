//! Tracing setup shared by the catalog library and CLI.
//!
//! Console output goes to stderr so stdout stays free for query results.
//! An optional daily-rolling file sink sits next to it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// Crates whose events follow the configured level
const OWN_TARGETS: &[&str] = &["shared", "catalog"];

/// Noisy dependencies held at warn
const QUIET_TARGETS: &[&str] = &["hyper", "reqwest", "h2", "rustls"];

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Resolved logging settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Binary name; also the log file prefix
    pub component: String,
    pub default_level: Level,
    pub console: bool,
    pub file: bool,
    /// JSON lines in the log file instead of plain text
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("data/logs"),
            component: "catalog".to_string(),
            default_level: Level::INFO,
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Build from the `[logging]` config section
    ///
    /// An unparseable level falls back to INFO.
    pub fn from_settings(settings: &LoggingConfig, log_dir: &Path, component: &str) -> Self {
        Self {
            log_dir: log_dir.to_path_buf(),
            component: component.to_string(),
            default_level: settings.default_level.parse().unwrap_or(Level::INFO),
            console: settings.console,
            file: settings.file,
            json_format: settings.json_format,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Filter used when RUST_LOG is unset
    fn filter_directive(&self) -> String {
        let level = self.default_level;
        let mut directives = vec![format!("{}={}", self.component.replace('-', "_"), level)];
        directives.extend(OWN_TARGETS.iter().map(|target| format!("{target}={level}")));
        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
        directives.join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.filter_directive()))
    }
}

fn console_layer<S>() -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .boxed()
}

fn file_layer<S>(config: &LogConfig) -> Result<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    std::fs::create_dir_all(&config.log_dir).with_context(|| {
        format!("Failed to create log directory: {}", config.log_dir.display())
    })?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, &config.component);

    let layer = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(appender)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(appender)
            .boxed()
    };

    Ok(layer)
}

/// Install the global subscriber
pub fn init(config: LogConfig) -> Result<()> {
    let mut layers = Vec::new();
    if config.console {
        layers.push(console_layer());
    }
    if config.file {
        layers.push(file_layer(&config)?);
    }

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        component = %config.component,
        file = config.file,
        log_dir = %config.log_dir.display(),
        "Logging initialized"
    );

    Ok(())
}
