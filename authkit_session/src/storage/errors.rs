use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The cookie could not be rendered as a `Set-Cookie` header value
    #[error("Header error: {0}")]
    Header(String),
}
