use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::config::{CURRENT_SEAL_VERSION, LEGACY_PAYLOAD_KEY, PASSWORD_ID, VERSION_DELIMITER};
use super::errors::SealError;
use super::iron::{Password, seal_string, unseal_string};

/// Version tag recovered from the suffix of a seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealVersion {
    /// `~2`, the format this crate writes
    Current,
    /// An explicit numeric tag other than the current one
    Legacy(u32),
    /// A suffix that is present but not a number
    Unrecognized(String),
    /// No `~` suffix at all
    Missing,
}

/// Splits a seal into the undecorated iron seal and its version tag.
///
/// Only the first two `~`-separated fields are considered.
pub fn parse_seal(seal: &str) -> (&str, SealVersion) {
    let mut fields = seal.split(VERSION_DELIMITER);
    let sealed = fields.next().unwrap_or_default();
    let version = match fields.next() {
        None => SealVersion::Missing,
        Some(tag) => match tag.parse::<u32>() {
            Ok(v) if v == CURRENT_SEAL_VERSION => SealVersion::Current,
            Ok(v) => SealVersion::Legacy(v),
            Err(_) => SealVersion::Unrecognized(tag.to_string()),
        },
    };
    (sealed, version)
}

/// Encrypts `payload` into a versioned seal.
///
/// `ttl_seconds == 0` embeds no expiry.
pub fn seal<T>(payload: &T, password: &str, ttl_seconds: u64) -> Result<String, SealError>
where
    T: Serialize + ?Sized,
{
    seal_at(payload, password, ttl_seconds, Utc::now().timestamp_millis())
}

pub(crate) fn seal_at<T>(
    payload: &T,
    password: &str,
    ttl_seconds: u64,
    now_ms: i64,
) -> Result<String, SealError>
where
    T: Serialize + ?Sized,
{
    let plaintext = serde_json::to_string(payload).map_err(|e| SealError::Serde(e.to_string()))?;
    let sealed = seal_string(
        &plaintext,
        Password {
            id: PASSWORD_ID,
            secret: password,
        },
        ttl_seconds.saturating_mul(1000),
        now_ms,
    )?;
    Ok(format!("{sealed}{VERSION_DELIMITER}{CURRENT_SEAL_VERSION}"))
}

/// Decrypts a seal produced by [`seal`] or by an earlier seal format.
pub fn unseal<T>(seal: &str, password: &str) -> Result<T, SealError>
where
    T: DeserializeOwned,
{
    unseal_at(seal, password, Utc::now().timestamp_millis())
}

pub(crate) fn unseal_at<T>(seal: &str, password: &str, now_ms: i64) -> Result<T, SealError>
where
    T: DeserializeOwned,
{
    let (sealed, version) = parse_seal(seal);

    let plaintext = unseal_string(
        sealed,
        Password {
            id: PASSWORD_ID,
            secret: password,
        },
        now_ms,
    )?;
    let data: Value = serde_json::from_str(&plaintext)
        .map_err(|e| SealError::Format(format!("Sealed payload is not JSON: {e}")))?;

    let data = match version {
        SealVersion::Current => data,
        SealVersion::Legacy(v) => {
            tracing::debug!("Unsealing legacy seal version {v}");
            unwrap_legacy(data)
        }
        SealVersion::Unrecognized(tag) => {
            tracing::debug!("Unsealing seal with unrecognized version tag {tag:?} as legacy");
            unwrap_legacy(data)
        }
        SealVersion::Missing => {
            tracing::debug!("Unsealing seal without version tag as legacy");
            unwrap_legacy(data)
        }
    };

    serde_json::from_value(data).map_err(|e| SealError::Serde(e.to_string()))
}

/// Legacy seals nest the session record under `persistent`; seals that predate
/// the wrapper carry the record directly.
fn unwrap_legacy(data: Value) -> Value {
    match data {
        Value::Object(mut map) if map.contains_key(LEGACY_PAYLOAD_KEY) => {
            map.remove(LEGACY_PAYLOAD_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}
