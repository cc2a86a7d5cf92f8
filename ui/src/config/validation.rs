use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing coder.url")]
    MissingUrl,
    #[error("Invalid coder.url: {url}")]
    InvalidUrl { url: String },
    #[error("Missing coder.session_token")]
    MissingSessionToken,
    #[error("Invalid request_timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    RequestTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::MissingUrl => "No deployment URL configured!\n\n\
                Set coder.url in config.toml, export WSCTL__CODER__URL, or pass --url."
                .to_string(),
            ConfigValidationError::InvalidUrl { url } => {
                format!(
                    "Deployment URL is not valid!\n\n\
                    Your configured value: {url}\n\n\
                    The URL must start with http:// or https://."
                )
            }
            ConfigValidationError::MissingSessionToken => "No session token configured!\n\n\
                Set coder.session_token in config.toml, export WSCTL__CODER__SESSION_TOKEN, or pass --token."
                .to_string(),
            ConfigValidationError::RequestTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update coder.request_timeout_secs in config.toml."
                )
            }
        }
    }
}

/// Configuration loading result
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}
