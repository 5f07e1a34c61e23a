//! `Fe26.2` seal format, byte-compatible with iron-webcrypto / iron-session.
//!
//! ```text
//! Fe26.2*<password id>*<enc salt>*<iv>*<ciphertext>*<expiration>*<mac salt>*<mac>
//! ```
//!
//! Both keys are PBKDF2-HMAC-SHA1 derived from the password and a random hex
//! salt (the hex string itself is the salt input). The payload is encrypted
//! with AES-256-CBC and the first six components are authenticated with
//! HMAC-SHA256.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::config::{MAC_PREFIX, SEAL_PARAMS};
use super::errors::SealError;
use crate::utils::{base64url_decode, base64url_encode, gen_random_bytes, gen_random_hex};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const SEAL_COMPONENTS: usize = 8;

#[derive(Clone, Copy)]
pub(crate) struct Password<'a> {
    pub(crate) id: &'a str,
    pub(crate) secret: &'a str,
}

impl std::fmt::Debug for Password<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("id", &self.id)
            .field("secret", &"[redacted]")
            .finish()
    }
}

fn check_password(secret: &str) -> Result<(), SealError> {
    // measured in UTF-16 code units, like a JavaScript string length
    if secret.encode_utf16().count() < SEAL_PARAMS.min_password_length {
        return Err(SealError::PasswordTooShort {
            min: SEAL_PARAMS.min_password_length,
        });
    }
    Ok(())
}

fn derive_key(secret: &str, salt: &str) -> Vec<u8> {
    let mut key = vec![0u8; SEAL_PARAMS.key_bytes];
    ring::pbkdf2::derive(
        ring::pbkdf2::PBKDF2_HMAC_SHA1,
        SEAL_PARAMS.iterations,
        salt.as_bytes(),
        secret.as_bytes(),
        &mut key,
    );
    key
}

fn hmac_digest(secret: &str, salt: &str, data: &str) -> Result<String, SealError> {
    let key = derive_key(secret, salt);
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| SealError::Crypto(format!("Invalid HMAC key: {e}")))?;
    mac.update(data.as_bytes());
    Ok(base64url_encode(&mac.finalize().into_bytes()))
}

fn expiration_component(ttl_ms: u64, now_ms: i64) -> Result<String, SealError> {
    if ttl_ms == 0 {
        return Ok(String::new());
    }
    i64::try_from(ttl_ms)
        .ok()
        .and_then(|ttl| {
            now_ms
                .checked_add(SEAL_PARAMS.localtime_offset_msec)?
                .checked_add(ttl)
        })
        .map(|expiration| expiration.to_string())
        .ok_or(SealError::TtlOutOfRange(ttl_ms))
}

/// Seals `plaintext` (already JSON-serialized) under `password`.
///
/// `ttl_ms == 0` leaves the expiration component empty.
pub(crate) fn seal_string(
    plaintext: &str,
    password: Password<'_>,
    ttl_ms: u64,
    now_ms: i64,
) -> Result<String, SealError> {
    check_password(password.secret)?;
    if !password.id.is_empty()
        && !password
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(SealError::Format("Invalid password id".to_string()));
    }

    let expiration = expiration_component(ttl_ms, now_ms)?;

    let encryption_salt = gen_random_hex(SEAL_PARAMS.salt_bits)?;
    let iv = gen_random_bytes(SEAL_PARAMS.iv_bytes)?;
    let key = derive_key(password.secret, &encryption_salt);

    let ciphertext = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| SealError::Crypto(format!("Invalid cipher parameters: {e}")))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mac_base = format!(
        "{MAC_PREFIX}*{}*{}*{}*{}*{}",
        password.id,
        encryption_salt,
        base64url_encode(&iv),
        base64url_encode(&ciphertext),
        expiration
    );

    let mac_salt = gen_random_hex(SEAL_PARAMS.salt_bits)?;
    let mac = hmac_digest(password.secret, &mac_salt, &mac_base)?;

    Ok(format!("{mac_base}*{mac_salt}*{mac}"))
}

/// Verifies and decrypts an `Fe26.2` seal, returning the JSON plaintext.
pub(crate) fn unseal_string(
    sealed: &str,
    password: Password<'_>,
    now_ms: i64,
) -> Result<String, SealError> {
    if sealed.is_empty() {
        return Err(SealError::Format("Invalid sealed string".to_string()));
    }

    let parts: Vec<&str> = sealed.split('*').collect();
    let [
        prefix,
        password_id,
        encryption_salt,
        encryption_iv,
        encrypted_b64,
        expiration,
        hmac_salt,
        hmac,
    ] = parts[..]
    else {
        tracing::debug!(
            "Seal has {} components, expected {}",
            parts.len(),
            SEAL_COMPONENTS
        );
        return Err(SealError::Format(
            "Incorrect number of sealed components".to_string(),
        ));
    };

    if prefix != MAC_PREFIX {
        return Err(SealError::Format("Wrong mac prefix".to_string()));
    }

    if !expiration.is_empty() {
        if !expiration.chars().all(|c| c.is_ascii_digit()) {
            return Err(SealError::Format("Invalid expiration".to_string()));
        }
        let exp: i64 = expiration
            .parse()
            .map_err(|_| SealError::Format("Invalid expiration".to_string()))?;
        let now_ms = now_ms + SEAL_PARAMS.localtime_offset_msec;
        if exp <= now_ms - SEAL_PARAMS.timestamp_skew_sec * 1000 {
            return Err(SealError::Expired);
        }
    }

    let lookup_id = if password_id.is_empty() {
        "default"
    } else {
        password_id
    };
    if lookup_id != password.id {
        return Err(SealError::Integrity(format!(
            "Cannot find password: {lookup_id}"
        )));
    }
    check_password(password.secret)?;

    let mac_base = format!(
        "{prefix}*{password_id}*{encryption_salt}*{encryption_iv}*{encrypted_b64}*{expiration}"
    );
    let expected = hmac_digest(password.secret, hmac_salt, &mac_base)?;
    if !bool::from(expected.as_bytes().ct_eq(hmac.as_bytes())) {
        return Err(SealError::Integrity("Bad hmac value".to_string()));
    }

    let ciphertext = base64url_decode(encrypted_b64)
        .map_err(|_| SealError::Format("Invalid encrypted payload encoding".to_string()))?;
    let iv = base64url_decode(encryption_iv)
        .map_err(|_| SealError::Format("Invalid iv encoding".to_string()))?;
    let key = derive_key(password.secret, encryption_salt);

    let plaintext = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| SealError::Format("Invalid iv length".to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| SealError::Format("Failed to decrypt seal".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| SealError::Format("Decrypted seal is not valid UTF-8".to_string()))
}
