//! Versioned, password-protected session seals.
//!
//! A seal is an iron `Fe26.2` string followed by `~<version>`. Version `2`
//! carries the session record directly; older and unversioned seals are
//! unwrapped from their `persistent` key.

mod config;
mod errors;
mod iron;
mod versioned;

pub use config::{CURRENT_SEAL_VERSION, MIN_PASSWORD_LENGTH, VERSION_DELIMITER};
pub use errors::SealError;
pub use versioned::{SealVersion, parse_seal, seal, unseal};
