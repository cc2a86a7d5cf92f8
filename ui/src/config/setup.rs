use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to determine config directory: {0}")]
    ConfigDirError(String),
}

/// Get the standard configuration directory for the current platform
pub fn get_config_dir() -> Result<PathBuf, SetupError> {
    // Prefer ~/.config/wsctl on Unix-like systems, fall back to platform defaults
    if cfg!(unix) {
        if let Some(mut home_path) = dirs::home_dir() {
            home_path.push(".config");
            home_path.push("wsctl");
            return Ok(home_path);
        }
    }

    dirs::config_dir()
        .map(|mut path| {
            path.push("wsctl");
            path
        })
        .ok_or_else(|| {
            SetupError::ConfigDirError("Unable to determine config directory".to_string())
        })
}

/// Get the standard configuration file path
pub fn get_config_file_path() -> Result<PathBuf, SetupError> {
    let mut config_dir = get_config_dir()?;
    config_dir.push("config.toml");
    Ok(config_dir)
}

/// Find config file using discovery priority
pub fn find_config_file() -> Option<PathBuf> {
    // Priority order:
    // 1. ./config.toml
    // 2. Standard OS config directory
    let current_dir_config = PathBuf::from("config.toml");
    if current_dir_config.exists() {
        return Some(current_dir_config);
    }

    match get_config_file_path() {
        Ok(standard_config) if standard_config.exists() => Some(standard_config),
        _ => None,
    }
}
