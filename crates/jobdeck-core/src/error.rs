use thiserror::Error;

/// Application-wide error types for jobdeck.
///
/// An empty listing result is **not** an error: `search` returning
/// `Ok(vec![])` means the board had nothing matching the query. Errors
/// here are transport or protocol failures only, so callers can render
/// "no jobs found" and "the board is unreachable" differently.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (malformed response, bad URL, protocol error).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The board API answered with a non-2xx status.
    #[error("API error (HTTP {status_code}): {message}")]
    ApiError {
        message: String,
        status_code: u16,
        retryable: bool,
    },

    /// Login/register failed or a token was rejected.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// A stored session is missing or unreadable.
    #[error("Session error: {0}")]
    SessionError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Bad configuration (base URL, filter field names).
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) => true,
            AppError::ApiError { retryable, .. } => *retryable,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }

    /// Returns true if this is a transport-level failure (endpoint
    /// unreachable, timed out, or a server-side 5xx) rather than a
    /// request the caller got wrong.
    pub fn is_transport(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::HttpError(_) => true,
            AppError::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}
