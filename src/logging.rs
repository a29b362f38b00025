//! Structured logging initialization
//!
//! All diagnostics go through `tracing`. This module installs the subscriber:
//! an `EnvFilter`, a JSON or pretty `fmt` layer and, optionally, a non-blocking
//! writer. Output goes to stderr so command output on stdout stays clean.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BRRTMVC_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `BRRTMVC_LOG_FORMAT` | `json` | json/pretty |
//! | `BRRTMVC_LOG_ASYNC` | `false` | buffer output on a background thread |
//! | `BRRTMVC_LOG_TARGET_FILTER` | unset | extra comma-separated filter directives |
//! | `BRRTMVC_LOG_INCLUDE_LOCATION` | `false` | add file:line to each event |
//!
//! `RUST_LOG`, when set, replaces the level-derived filter.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for people
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a background thread
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: false,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("BRRTMVC_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("BRRTMVC_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            async_logging: env_flag("BRRTMVC_LOG_ASYNC").unwrap_or(defaults.async_logging),
            target_filter: env::var("BRRTMVC_LOG_TARGET_FILTER").ok(),
            include_location: env_flag("BRRTMVC_LOG_INCLUDE_LOCATION")
                .unwrap_or(defaults.include_location),
        }
    }

    /// Verbose, human-readable configuration for local runs and tests
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Self::default()
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(parsed) => filter = filter.add_directive(parsed),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Install the global subscriber.
///
/// Returns the writer guard when `async_logging` is on; keep it alive until exit
/// so buffered events are flushed.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use brrtmvc::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
