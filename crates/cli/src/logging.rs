use anyhow::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the CLI log inside the data directory
pub const LOG_FILE: &str = "cli.log";

/// Initialize logging for the CLI
///
/// Console output goes to stderr so command results on stdout stay
/// machine-readable. `RUST_LOG` takes precedence over `log_level`.
pub fn init_logging(log_level: Level, data_dir: &Path, no_file_log: bool) -> Result<()> {
    let env_filter = default_filter(log_level);

    if no_file_log {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(());
    }

    let log_file_path = log_file_path(data_dir);
    if let Some(parent) = log_file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn default_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("codemarket={level},codemarket_http={level},codemarket_session={level}").into()
    })
}

fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}
