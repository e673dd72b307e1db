//! Tracing configuration for the job marketplace shell
//!
//! Console output goes to stderr: stdout carries the JSON-lines protocol.
//! A copy of every record is written to `logs/jobmarket.log` under the
//! resolved data directory.

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

use jm_app::app_paths::AppPaths;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "jobmarket.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives, used when `RUST_LOG` is unset.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("jm_core={level}"),
        format!("jm_app={level}"),
        format!("jm_infra={level}"),
        format!("jm_shell={level}"),
    ]
}

/// Initialize the tracing subscriber.
///
/// Respects `RUST_LOG`; otherwise debug in development builds and info in
/// release builds. The log file lives in `paths.logs_dir`. Must be called
/// once, before any logging occurs.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(paths: &AppPaths) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stderr_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match build_file_writer(&paths.logs_dir) {
        Ok((writer, guard)) => {
            if LOG_GUARD.set(guard).is_err() {
                anyhow::bail!("Tracing log guard already initialized");
            }
            Some(writer)
        }
        Err(err) => {
            eprintln!("Failed to initialize file logging, logging to stderr only: {err}");
            None
        }
    };

    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stderr_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

/// Non-blocking writer for `<logs_dir>/jobmarket.log`. Records are flushed
/// when the guard is dropped.
fn build_file_writer(logs_dir: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(logs_dir)?;
    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    Ok(tracing_appender::non_blocking(file_appender))
}
