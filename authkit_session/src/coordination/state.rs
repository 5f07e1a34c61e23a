use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use serde::{Deserialize, Serialize};

use super::errors::CoordinationError;

/// Data carried through the OAuth round trip in the `state` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_pathname: Option<String>,
}

/// Encodes `{"returnPathname": ...}` as padded standard base64.
pub fn encode_state(return_pathname: &str) -> Result<String, CoordinationError> {
    let state = ReturnState {
        return_pathname: Some(return_pathname.to_string()),
    };
    let state_json = serde_json::to_string(&state)
        .map_err(|e| CoordinationError::InvalidState(e.to_string()))?;
    Ok(STANDARD.encode(state_json))
}

/// Decodes a `state` parameter produced by [`encode_state`].
///
/// URL-safe base64 without padding is accepted as well.
pub fn decode_state(state: &str) -> Result<ReturnState, CoordinationError> {
    let decoded_bytes = STANDARD
        .decode(state)
        .or_else(|_| URL_SAFE_NO_PAD.decode(state))
        .map_err(|e| CoordinationError::InvalidState(format!("Failed to decode base64: {e}")))?;
    let decoded_state_string = String::from_utf8(decoded_bytes)
        .map_err(|e| CoordinationError::InvalidState(format!("Failed to decode UTF-8: {e}")))?;
    let state: ReturnState = serde_json::from_str(&decoded_state_string)
        .map_err(|e| CoordinationError::InvalidState(e.to_string()))?;
    Ok(state)
}

/// Only same-origin absolute paths are honored as redirect targets.
pub(super) fn safe_return_pathname(state: &ReturnState) -> String {
    match state.return_pathname.as_deref() {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        Some(path) => {
            tracing::debug!("Ignoring non-local return path: {}", path);
            "/".to_string()
        }
        None => "/".to_string(),
    }
}
