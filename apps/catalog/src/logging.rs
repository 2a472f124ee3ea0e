//! Logging initialization for catalog binaries
//!
//! Supports configuration-based logging with file rotation, JSON formatting
//! and `RUST_LOG` overrides.

use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writer alive; drop it last.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize logging from `LoggingConfig`:
/// - JSON or human-readable formats
/// - File logging with rotation (daily, hourly, minutely, never)
/// - `RUST_LOG` overrides the configured level
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let (layers, file_guard) = log_layers(config)?;
    tracing_subscriber::registry()
        .with(layers)
        .with(build_env_filter(config))
        .init();

    tracing::info!(
        service_name = %config.service_name,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Keep sqlx statement logging quiet unless asked for
        EnvFilter::new(format!(
            "constellation={},constellation_path={},cstl={},sqlx=warn",
            config.level, config.level, config.level
        ))
    })
}

/// The stderr layer, plus a file layer when file logging is enabled.
fn log_layers(
    config: &LoggingConfig,
) -> anyhow::Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    // stdout carries command output, logs go to stderr
    let mut layers = vec![format_layer(config.json, true, std::io::stderr)];
    if !config.file_enabled {
        return Ok((layers, None));
    }

    let (writer, guard) = file_writer(config)?;
    layers.push(format_layer(config.json, false, writer));
    Ok((layers, Some(guard)))
}

fn format_layer<W>(json: bool, ansi: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        layer
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed()
    } else {
        layer.boxed()
    }
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn file_writer(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let rotation = rotation(&config.file_rotation);
    // Rotated files get a date suffix; a single file needs its own extension
    let file_name = if rotation == Rotation::NEVER {
        format!("{}.log", config.file_prefix)
    } else {
        config.file_prefix.clone()
    };
    let appender = RollingFileAppender::new(rotation, &config.file_directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging from `RUST_LOG` only, for tools that run without a
/// configuration file.
pub fn init_simple_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "constellation=info,constellation_path=info,cstl=info,sqlx=warn".into()
        }))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_names_fall_back_to_daily() {
        assert_eq!(rotation("hourly"), Rotation::HOURLY);
        assert_eq!(rotation("minutely"), Rotation::MINUTELY);
        assert_eq!(rotation("never"), Rotation::NEVER);
        assert_eq!(rotation("daily"), Rotation::DAILY);
        assert_eq!(rotation("weekly"), Rotation::DAILY);
    }

    #[test]
    fn file_logging_adds_a_layer_and_creates_the_directory() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let console_only = LoggingConfig::default();
        let (layers, guard) = log_layers(&console_only)?;
        assert_eq!(layers.len(), 1);
        assert!(guard.is_none());

        let with_file = LoggingConfig {
            json: true,
            file_enabled: true,
            file_directory: temp.path().join("logs"),
            file_rotation: "never".to_string(),
            ..LoggingConfig::default()
        };
        let (layers, guard) = log_layers(&with_file)?;
        assert_eq!(layers.len(), 2);
        assert!(guard.is_some());
        assert!(with_file.file_directory.is_dir());
        Ok(())
    }
}
