//! CLI configuration loading

use codemarket_http::ClientConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CODEMARKET";

/// Name of the optional config file inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory: explicit flag, then `CODEMARKET_DATA_DIR`,
/// then the platform data directory
pub fn data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        if let Ok(dir) = std::env::var("CODEMARKET_DATA_DIR") {
            PathBuf::from(dir)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("codemarket")
        }
    })
}

/// Load client configuration
///
/// Sources in increasing priority: built-in defaults, `config.toml` in the
/// data directory, `CODEMARKET_*` environment variables (`__` separates
/// nested keys, e.g. `CODEMARKET_QUERY__RETRIES`), then `base_url`.
pub fn load_client_config(
    data_dir: &Path,
    base_url: Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(Config::try_from(&ClientConfig::default())?)
        .add_source(File::from(data_dir.join(CONFIG_FILE)).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("base_url", base_url)?;

    builder.build()?.try_deserialize()
}
