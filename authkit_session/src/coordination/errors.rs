use thiserror::Error;

use crate::config::ConfigError;
use crate::encryption::SealError;
use crate::session::ProviderError;
use crate::storage::StorageError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinationError {
    /// The configuration failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session cookie could not be sealed or unsealed
    #[error("Invalid session: {0}")]
    Seal(SealError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error reported by the session/authentication service
    #[error("Upstream error: {0}")]
    Upstream(ProviderError),

    /// The authorization server redirected back with an `error` parameter
    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Missing authorization code")]
    MissingCode,

    #[error("User must be authenticated")]
    Unauthenticated,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Config(err) => tracing::error!("Configuration error: {}", err),
            Self::Seal(err) => tracing::error!("Invalid session: {}", err),
            Self::Storage(err) => tracing::error!("Storage error: {}", err),
            Self::Upstream(err) => tracing::error!("Upstream error: {}", err),
            Self::OAuth(message) => tracing::error!("OAuth error: {}", message),
            Self::MissingCode => tracing::error!("Missing authorization code"),
            Self::Unauthenticated => tracing::error!("User must be authenticated"),
            Self::InvalidState(message) => tracing::error!("Invalid state: {}", message),
        }
        self
    }

    /// Whether the request simply carries no usable session.
    pub fn is_invalid_session(&self) -> bool {
        match self {
            Self::Seal(err) => err.is_invalid_session(),
            Self::Upstream(ProviderError::Unauthorized(_)) => true,
            _ => false,
        }
    }
}

impl From<SealError> for CoordinationError {
    fn from(err: SealError) -> Self {
        let error = Self::Seal(err);
        tracing::debug!("{}", error);
        error
    }
}

impl From<ProviderError> for CoordinationError {
    fn from(err: ProviderError) -> Self {
        let error = Self::Upstream(err);
        tracing::error!("{}", error);
        error
    }
}
