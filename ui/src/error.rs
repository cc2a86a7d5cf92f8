use crate::config::ConfigValidationError;
use server::batch_actions::ErrorNotifier;
use server::common::ApiError;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Application-wide error types for the wsctl command line tool.
///
/// # Error Categories
///
/// - [`Config`] - configuration loading and validation errors
/// - [`Api`] - workspace API failures outside of a batch (listing, client setup)
/// - [`Selection`] - the requested workspaces could not be resolved
/// - [`Io`] - terminal input and output failures
///
/// Failures of individual calls inside a batch never become an `AppError`:
/// the coordinator folds them into a single notification instead.
///
/// [`Config`]: AppError::Config
/// [`Api`]: AppError::Api
/// [`Selection`]: AppError::Selection
/// [`Io`]: AppError::Io
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(#[from] ApiError),

    #[error("Selection Error: {0}")]
    Selection(String),

    #[error("IO Error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Context information for errors
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub user_message: String,
    pub suggestion: Option<String>,
}

impl ErrorContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            user_message: format!("An error occurred in {component}. Please try again."),
            suggestion: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.user_message = message.to_string();
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Central error reporting system.
///
/// Everything reported is logged with its context and echoed to the user's
/// terminal. It is also the notifier handed to the batch coordinator.
#[derive(Clone)]
pub struct ErrorReporter {
    out: SharedWriter,
}

impl ErrorReporter {
    pub fn stderr() -> Self {
        Self::with_writer(std::io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Report a simple error with basic context
    pub fn report_simple(&self, error: &AppError, component: &str, operation: &str) {
        let context = ErrorContext::new(component, operation).with_message(&error.to_string());
        self.report(error, context);
    }

    /// Report every configuration problem, each with the text telling the
    /// user how to fix it.
    pub fn report_config_errors(&self, errors: &[ConfigValidationError]) {
        for error in errors {
            let context = ErrorContext::new("Config", "validate")
                .with_message(&error.to_string())
                .with_suggestion(&error.user_message());
            self.report(&AppError::Config(error.to_string()), context);
        }
    }

    /// Report error with full context
    pub fn report(&self, error: &AppError, context: ErrorContext) {
        log::error!(
            "[{}:{}] {}{}",
            context.component,
            context.operation,
            error,
            context
                .suggestion
                .as_deref()
                .map(|s| format!(" (suggestion: {s})"))
                .unwrap_or_default()
        );

        self.show(&format!("Error: {}", context.user_message));
        if let Some(suggestion) = &context.suggestion {
            for line in suggestion.lines().filter(|l| !l.trim().is_empty()) {
                self.show(&format!("  {line}"));
            }
        }
    }

    fn show(&self, line: &str) {
        match self.out.lock() {
            Ok(mut out) => {
                if let Err(e) = writeln!(out, "{line}") {
                    log::error!("Failed to write error message to terminal: {e}");
                }
            }
            Err(e) => log::error!("Error output lock poisoned: {e}"),
        }
    }
}

impl ErrorNotifier for ErrorReporter {
    fn notify_error(&self, message: &str) {
        log::error!("[BatchActions] {message}");
        self.show(&format!("Error: {message}"));
    }
}
