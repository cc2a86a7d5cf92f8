use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod coder;
pub mod limits;
pub mod setup;
pub mod validation;

pub use app::AppConfig;
pub use coder::CoderConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Prefix for environment overrides, e.g. `WSCTL__CODER__URL`
pub const ENV_PREFIX: &str = "WSCTL";

/// Load configuration from a config file and environment variables.
///
/// An explicit path must exist. Without one, `./config.toml` and then the
/// platform config directory are tried, and a missing file is not an error:
/// everything may come from the environment or command line flags.
///
/// Runs before the logger exists, so the file that was read is recorded in
/// [`AppConfig::source`] instead of being logged here.
pub fn load_config(explicit_path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();

    let mut builder = Config::builder();

    let source = explicit_path
        .map(Path::to_path_buf)
        .or_else(setup::find_config_file);
    if let Some(path) = &source {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    // environment entries override file values when present
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");

    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(mut app_config) => {
            app_config.set_source(source);
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
