//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - console output with `EnvFilter` (RUST_LOG aware)
//! - optional daily-rotating file output

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `level` - default log level when RUST_LOG is unset (e.g. "info")
/// * `log_dir` - optional directory for daily-rotating file logs
///
/// Returns the appender guard when file logging is enabled; the caller
/// must keep it alive for the lifetime of the process.
pub fn init_logger(level: &str, log_dir: Option<&str>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "comanda.log");
            let (file_writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(file_writer).with_ansi(false))
                .try_init()?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .try_init()?;

            Ok(None)
        }
    }
}
