//! Codemarket CLI - marketplace client for the terminal

mod commands;
mod config;
mod logging;
mod output;
mod storage;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use codemarket_http::{MarketClient, TokenStore};
use codemarket_session::AuthSession;
use commands::Commands;
use output::{LoggedNavigator, StderrNotifier};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use storage::FileStorage;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "codemarket")]
#[command(about = "Browse, buy and sell code on the Codemarket marketplace")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Data directory for tokens, configuration and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// API base URL (overrides config.toml and CODEMARKET_BASE_URL)
    #[arg(short = 'u', long, global = true)]
    base_url: Option<String>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "300")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = config::data_dir(cli.data_dir);
    logging::init_logging(cli.log_level.into(), &data_dir, cli.no_file_log)?;

    let client_config = config::load_client_config(&data_dir, cli.base_url)?;
    debug!(base_url = %client_config.base_url, data_dir = %data_dir.display(), "Loaded configuration");

    let tokens = TokenStore::new(Arc::new(FileStorage::in_dir(&data_dir)));
    let client = MarketClient::from_config(&client_config, tokens)?;
    let session = AuthSession::new(client, Rc::new(StderrNotifier), Rc::new(LoggedNavigator));

    let outcome = if cli.timeout == 0 {
        cli.command.execute(&session).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(&session)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "Command timed out after {} seconds",
                cli.timeout
            )),
        }
    };

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
