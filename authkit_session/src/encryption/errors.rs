use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SealError {
    /// The seal failed authentication: tampered data, wrong password, or unknown password id
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// The input is not parseable as a seal
    #[error("Format error: {0}")]
    Format(String),

    #[error("Expired seal")]
    Expired,

    /// The requested ttl cannot be represented as an expiration timestamp
    #[error("Seal ttl out of range: {0} ms")]
    TtlOutOfRange(u64),

    #[error("Password string too short (min {min} characters required)")]
    PasswordTooShort { min: usize },

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl SealError {
    /// Whether the caller should treat the session as absent rather than failing.
    pub fn is_invalid_session(&self) -> bool {
        matches!(
            self,
            SealError::Integrity(_) | SealError::Format(_) | SealError::Expired
        )
    }
}
