use thiserror::Error;

/// Failures reported by the external session/authentication service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The session is invalid, expired, or could not be refreshed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The upstream request failed
    #[error("Request error: {0}")]
    Request(String),

    /// The upstream response could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
