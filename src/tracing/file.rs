use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::prelude::*;

use super::filter::DebugOnlyFilter;
use super::filter::ErrorWarnFilter;
#[cfg(not(feature = "dev"))]
use super::filter::ErrorOnlyFilter;
#[cfg(feature = "dev")]
use super::filter::InfoAndAboveFilter;
use super::format::MizanFormat;
use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writers alive; drop it on shutdown to flush
#[must_use]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

fn file_layer(
    format: &MizanFormat,
    directory: &Path,
    engine_name: &str,
    guards: &mut Vec<WorkerGuard>,
) -> tracing_subscriber::fmt::Layer<
    Registry,
    tracing_subscriber::fmt::format::DefaultFields,
    MizanFormat,
    tracing_appender::non_blocking::NonBlocking,
> {
    let appender = RollingFileAppender::new(Rotation::DAILY, directory, format!("{}.log", engine_name));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);

    tracing_subscriber::fmt::Layer::default()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .event_format(format.clone())
        .with_writer(writer)
}

/// Install the global subscriber: daily rolling debug and error files under
/// `logging.directory`, plus stderr output (errors only under `prod`,
/// info and above under `dev`, or whatever `RUST_LOG` asks for).
pub fn setup_tracing(
    engine_name: &str,
    logging_config: &LoggingConfig,
) -> crate::Result<LogGuards> {
    let base_logs_dir = Path::new(logging_config.directory.as_deref().unwrap_or(".logs"));
    let debug_dir = base_logs_dir.join("debug");
    let error_dir = base_logs_dir.join("error");

    for dir in [base_logs_dir, debug_dir.as_path(), error_dir.as_path()] {
        std::fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("failed to create logs directory {}: {}", dir.display(), e))?;
    }

    let format = MizanFormat {
        engine_name: engine_name.to_string(),
    };
    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    layers.push(
        file_layer(&format, &debug_dir, engine_name, &mut guards)
            .with_filter(DebugOnlyFilter)
            .boxed(),
    );
    layers.push(
        file_layer(&format, &error_dir, engine_name, &mut guards)
            .with_filter(ErrorWarnFilter)
            .boxed(),
    );

    let terminal = tracing_subscriber::fmt::Layer::default()
        .with_ansi(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .event_format(format.clone())
        .with_writer(std::io::stderr);

    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => layers.push(terminal.with_filter(env_filter).boxed()),
        #[cfg(feature = "dev")]
        Err(_) => layers.push(terminal.with_filter(InfoAndAboveFilter).boxed()),
        #[cfg(not(feature = "dev"))]
        Err(_) => layers.push(terminal.with_filter(ErrorOnlyFilter).boxed()),
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {}", e))?;

    tracing::info!(
        "{}_logging_started::debug_logs::{}::error_logs::{}",
        engine_name,
        debug_dir.display(),
        error_dir.display()
    );

    Ok(LogGuards { _guards: guards })
}
