use super::{
    LoggingConfig, coder::CoderConfig, limits::*, validation::ConfigValidationError,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Search filter applied when listing workspaces, e.g. `owner:me`
    workspace_filter: Option<String>,

    #[serde(default)]
    coder: CoderConfig,
    #[serde(default)]
    logging: LoggingConfig,

    #[serde(skip)]
    source: Option<PathBuf>,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        match self.coder.url() {
            None => errors.push(ConfigValidationError::MissingUrl),
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                errors.push(ConfigValidationError::InvalidUrl {
                    url: url.to_string(),
                });
            }
            Some(_) => {}
        }

        if self.coder.session_token().is_none() {
            errors.push(ConfigValidationError::MissingSessionToken);
        }

        let timeout = self.coder.request_timeout_secs();
        if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::RequestTimeout {
                configured: timeout,
                min_limit: MIN_REQUEST_TIMEOUT_SECS,
                max_limit: MAX_REQUEST_TIMEOUT_SECS,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Apply command line overrides on top of file and environment values
    pub fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url {
            self.coder.set_url(url);
        }
        if let Some(token) = token {
            self.coder.set_session_token(token);
        }
    }

    /// Config file the values were read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub(super) fn set_source(&mut self, source: Option<PathBuf>) {
        self.source = source;
    }

    pub fn workspace_filter(&self) -> Option<&str> {
        self.workspace_filter.as_deref()
    }

    // Configuration section accessors
    pub fn coder(&self) -> &CoderConfig {
        &self.coder
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}
