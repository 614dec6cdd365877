use std::{
    env, fs, panic,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{
    error::{Result, ShellError},
    DEFAULT_FILE_LOG_FILTER, LOG_FILE_NAME, LOG_FILTER_ENV,
};

const CONSOLE_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub(crate) struct LogConfig {
    pub(crate) log_dir: PathBuf,
    pub(crate) file_filter: String,
}

impl LogConfig {
    pub(crate) fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            file_filter: file_filter_from(env::var(LOG_FILTER_ENV).ok().as_deref()),
        }
    }
}

fn file_filter_from(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_FILE_LOG_FILTER)
        .to_string()
}

/// Owns the process-wide log pipeline. Buffered file output is written out
/// when [`LogService::flush`] runs or the service is dropped.
#[derive(Debug)]
pub(crate) struct LogService {
    guard: Mutex<Option<WorkerGuard>>,
    log_path: PathBuf,
}

impl LogService {
    pub(crate) fn init(config: &LogConfig) -> Result<Self> {
        fs::create_dir_all(&config.log_dir)?;

        let file_filter = EnvFilter::try_new(&config.file_filter).map_err(|error| {
            ShellError::Logging(format!(
                "invalid log filter '{}': {error}",
                config.file_filter
            ))
        })?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_NAME);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .with_filter(file_filter),
            )
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(EnvFilter::new(CONSOLE_LOG_FILTER)),
            )
            .try_init()
            .map_err(|error| ShellError::Logging(error.to_string()))?;

        install_panic_hook();

        Ok(Self {
            guard: Mutex::new(Some(guard)),
            log_path: resolve_log_path(&config.log_dir),
        })
    }

    pub(crate) fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub(crate) fn flush(&self) {
        let guard = match self.guard.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if guard.is_some() {
            tracing::debug!("flushing log output");
            drop(guard);
        }
    }
}

pub(crate) fn resolve_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "unhandled panic");
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_filter_defaults_to_debug() {
        assert_eq!(file_filter_from(None), "debug");
        assert_eq!(file_filter_from(Some("  ")), "debug");
    }

    #[test]
    fn file_filter_accepts_directives() {
        assert_eq!(
            file_filter_from(Some(" boxhero_desktop=trace,info ")),
            "boxhero_desktop=trace,info"
        );
    }

    #[test]
    fn resolve_log_path_joins_log_file_name() {
        let path = resolve_log_path(Path::new("/tmp/boxhero/logs"));
        assert_eq!(path, Path::new("/tmp/boxhero/logs").join("boxhero.log"));
    }
}
