//! Telemetry and logging initialization.
//!
//! Sets up structured logging with tracing and optional JSON output.

use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::LoggingConfig;

// Keeps the non-blocking file writer flushing for the life of the process
static LOG_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(None);

/// Initialize logging from the host's logging configuration.
pub fn init_from_config(config: &LoggingConfig) -> anyhow::Result<()> {
    match &config.log_file {
        Some(path) => init_telemetry_with_file(&config.level, path, config.format == "json"),
        None => init_telemetry(&config.level, config.format == "json"),
    }
}

/// Initialize logging to stdout.
pub fn init_telemetry(log_level: &str, json_format: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level)?;

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init()?;
    }

    Ok(())
}

/// Initialize logging to an append-only file.
pub fn init_telemetry_with_file(
    log_level: &str,
    log_file: &std::path::Path,
    json_format: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level)?;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    file_subscriber(filter, non_blocking, json_format).try_init()?;

    if let Ok(mut g) = LOG_GUARD.lock() {
        *g = Some(guard);
    }

    Ok(())
}

// Exactly one of the two layers is present
fn file_subscriber<W>(
    filter: EnvFilter,
    writer: W,
    json_format: bool,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> fmt::MakeWriter<'w> + Clone + Send + Sync + 'static,
{
    let json_layer = json_format.then(|| fmt::layer().json().with_writer(writer.clone()));
    let text_layer = (!json_format).then(|| fmt::layer().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
}
