use super::limits::DEFAULT_REQUEST_TIMEOUT_SECS;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the workspaces API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoderConfig {
    url: Option<String>,
    session_token: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl CoderConfig {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs())
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    pub fn set_session_token(&mut self, token: impl Into<String>) {
        self.session_token = Some(token.into());
    }
}
