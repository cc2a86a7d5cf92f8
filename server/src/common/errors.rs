use thiserror::Error;

/// Errors raised by a single call against the workspaces API.
///
/// Every start/stop/delete request made on behalf of a batch resolves to
/// either `Ok(())` or one of these variants. The batch coordinator never shows
/// them to the user individually; they are logged and folded into the
/// aggregate outcome of the batch.
///
/// # Error Categories
///
/// - [`ClientCreation`] - HTTP client initialization failures
/// - [`Transport`] - the request never produced a response
/// - [`RequestFailed`] - the server answered with a non-success status
/// - [`InvalidResponse`] - a success response whose body could not be decoded
///
/// # Examples
///
/// ```no_run
/// use server::common::errors::ApiError;
///
/// fn describe(error: &ApiError) -> String {
///     match error {
///         ApiError::RequestFailed { status, .. } if *status == 404 => {
///             "workspace no longer exists".to_string()
///         }
///         other => other.to_string(),
///     }
/// }
/// ```
///
/// [`ClientCreation`]: ApiError::ClientCreation
/// [`Transport`]: ApiError::Transport
/// [`RequestFailed`]: ApiError::RequestFailed
/// [`InvalidResponse`]: ApiError::InvalidResponse
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Failed to create HTTP client: {reason}")]
    ClientCreation { reason: String },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status}: {body}")]
    RequestFailed {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

impl ApiError {
    /// HTTP status of the failed request, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
