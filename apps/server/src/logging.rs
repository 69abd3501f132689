//! Logging initialization for the server binary
//!
//! Console output is always on; a rolling log file can be added. `RUST_LOG`
//! overrides the configured level.

use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the background file writer alive. Drop it last: buffered lines are
/// flushed when it goes away.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// Fails if a subscriber is already installed or the log directory cannot be
/// created.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let (file_writer, file_guard) = if config.file_enabled {
        let (writer, guard) = file_appender(config)?;
        (Some(writer), Some(guard))
    } else {
        (None, None)
    };

    let registry = tracing_subscriber::registry().with(env_filter(config));

    if config.json {
        let file_layer = file_writer.map(|writer| {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer)
        });
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stdout),
            )
            .with(file_layer)
            .try_init()?;
    } else {
        let file_layer = file_writer.map(|writer| {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
        });
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stdout),
            )
            .with(file_layer)
            .try_init()?;
    }

    tracing::info!(
        level = %config.level,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(config)))
}

/// Directives used when `RUST_LOG` is unset. SQL statement logs stay at warn.
fn default_directives(config: &LoggingConfig) -> String {
    format!(
        "nodepop={level},nodepop_server={level},nodepop_query={level},tower_http=debug,sqlx=warn",
        level = config.level
    )
}

fn file_appender(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let rotation = config.rotation().unwrap_or(Rotation::DAILY);
    let file_name = if rotation == Rotation::NEVER {
        format!("{}.log", config.file_prefix)
    } else {
        config.file_prefix.clone()
    };
    let appender = RollingFileAppender::new(rotation, &config.file_directory, file_name);

    Ok(tracing_appender::non_blocking(appender))
}
