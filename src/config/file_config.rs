//! Configuration file support.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `OEIS_*` environment variables.
//!
//! # Configuration File Format
//!
//! ```toml
//! base_url = "https://oeis.org"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! user_agent = "my-tool/1.0"
//! requests_per_second = 2
//!
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 500
//! max_delay_ms = 30000
//! backoff_multiplier = 2.0
//! ```

use std::path::{Path, PathBuf};

use super::ClientConfig;

/// Prefix of the environment variables read on top of the file
pub const ENV_PREFIX: &str = "OEIS";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default location of the config file, e.g. `~/.config/oeis-client/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("oeis-client").join("config.toml"))
}

/// Load configuration from a TOML file, with `OEIS_*` environment overrides
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    build(Some(path), config::Environment::with_prefix(ENV_PREFIX))
}

pub(super) fn build(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<ClientConfig, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let config: ClientConfig = builder
        .add_source(env.try_parsing(true))
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}

impl ClientConfig {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
