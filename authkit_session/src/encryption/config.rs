//! Fixed algorithm parameters for session seals.
//!
//! These values are part of the wire format. Seals issued by one deployment
//! are read by every other deployment sharing the cookie password, so any
//! change here must ship under a new [`CURRENT_SEAL_VERSION`].

use std::num::NonZeroU32;

/// Delimiter between the iron seal and its version tag.
pub const VERSION_DELIMITER: char = '~';

/// Version stamped on every seal this crate produces.
pub const CURRENT_SEAL_VERSION: u32 = 2;

/// Prefix of the iron seal format.
pub(crate) const MAC_PREFIX: &str = "Fe26.2";

/// Identifier of the single password in the password map (`{ 1: password }`).
pub(crate) const PASSWORD_ID: &str = "1";

/// Key under which pre-version-2 seals nest the session record.
pub(crate) const LEGACY_PAYLOAD_KEY: &str = "persistent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SealParams {
    pub(crate) salt_bits: usize,
    /// AES-256 key and HMAC-SHA256 key length.
    pub(crate) key_bytes: usize,
    pub(crate) iv_bytes: usize,
    pub(crate) iterations: NonZeroU32,
    pub(crate) min_password_length: usize,
    pub(crate) timestamp_skew_sec: i64,
    pub(crate) localtime_offset_msec: i64,
}

pub(crate) const SEAL_PARAMS: SealParams = SealParams {
    salt_bits: 256,
    key_bytes: 32,
    iv_bytes: 16,
    iterations: NonZeroU32::MIN,
    min_password_length: 32,
    timestamp_skew_sec: 60,
    localtime_offset_msec: 0,
};

/// Shortest cookie password accepted by the codec and by configuration validation.
pub const MIN_PASSWORD_LENGTH: usize = SEAL_PARAMS.min_password_length;
