use std::fmt;

/// Error types that can occur when running a reasoning chain.
#[derive(Debug)]
pub enum ChainError {
    /// HTTP request/response errors
    HttpError(String),
    /// Authentication and authorization errors
    AuthError(String),
    /// Invalid request parameters or format
    InvalidRequest(String),
    /// Errors returned by the completion service
    ProviderError(String),
    /// JSON serialization/deserialization errors
    JsonError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::HttpError(e) => write!(f, "HTTP Error: {}", e),
            ChainError::AuthError(e) => write!(f, "Auth Error: {}", e),
            ChainError::InvalidRequest(e) => write!(f, "Invalid Request: {}", e),
            ChainError::ProviderError(e) => write!(f, "Provider Error: {}", e),
            ChainError::JsonError(e) => write!(f, "JSON Parse Error: {}", e),
        }
    }
}

impl std::error::Error for ChainError {}

/// Converts reqwest HTTP errors into ChainErrors
impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::HttpError(err.to_string())
    }
}
