//! Logging configuration module
//!
//! Builds the `tracing` dispatcher handed to [`Cluster`](crate::kubernetes::cluster::Cluster)
//! and, optionally, installs it as the process-wide default.

use std::io;
use std::path::PathBuf;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "warn", "kubeglance_core=debug")
    pub level: String,
    /// Directory for JSON log files; console only when `None`
    pub file_path: Option<PathBuf>,
    pub rotation: LogRotation,
    /// Render console output as JSON instead of text
    pub json_format: bool,
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
            json_format: false,
        }
    }
}

/// Built dispatcher plus the guard that keeps the file writer flushing
pub struct Logging {
    pub dispatch: Dispatch,
    guard: Option<WorkerGuard>,
}

impl Logging {
    /// Install this dispatcher as the global default.
    ///
    /// Returns the guard, which must be held for file output to be flushed.
    pub fn init(self) -> Result<Option<WorkerGuard>, tracing::dispatcher::SetGlobalDefaultError> {
        tracing::dispatcher::set_global_default(self.dispatch)?;
        Ok(self.guard)
    }
}

impl LoggingConfig {
    /// Build a dispatcher without touching global state
    pub fn build(&self) -> Logging {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let console_layer = if self.json_format {
            fmt::layer()
                .with_target(true)
                .with_writer(io::stderr)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_writer(io::stderr)
                .boxed()
        };

        let (file_layer, guard) = match &self.file_path {
            Some(path) => {
                let file_appender = match self.rotation {
                    LogRotation::Hourly => rolling::hourly(path, "kubeglance.log"),
                    LogRotation::Daily => rolling::daily(path, "kubeglance.log"),
                    LogRotation::Never => rolling::never(path, "kubeglance.log"),
                };
                let (writer, guard) = non_blocking(file_appender);

                let layer = fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(writer);

                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer);

        Logging {
            dispatch: Dispatch::new(subscriber),
            guard,
        }
    }

    /// Build from `RUST_LOG` and `KUBEGLANCE_LOG_PATH`
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let file_path = std::env::var("KUBEGLANCE_LOG_PATH").ok().map(PathBuf::from);

        Self {
            level,
            file_path,
            ..Default::default()
        }
    }
}
