// src/logging.rs
//! Tracing setup. The terminal belongs to the UI, so logs only go to a file.

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{
    Layer,
    filter::{Directive, EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogSection;

/// Parse the configured level, falling back to INFO on anything unreadable.
fn default_directive(level: &str) -> Directive {
    level
        .parse::<Directive>()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}

/// Install the global subscriber. Returns the log file path when logging is on.
/// `file` overrides the configured path.
pub fn init<'a>(config: &'a LogSection, file: Option<&'a Path>) -> Result<Option<&'a Path>> {
    let Some(path) = file.or(config.file.as_deref()) else {
        return Ok(None);
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let log_file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::builder()
        .with_default_directive(default_directive(&config.level))
        .from_env_lossy();

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_thread_names(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    tracing::info!("Logging initialized at level: {}", config.level);
    Ok(Some(path))
}
