//! Central configuration for the authkit-axum crate

use std::sync::LazyLock;

const DEFAULT_ERROR_URL: &str = "/auth/error";
const DEFAULT_SIGN_OUT_REDIRECT: &str = "/";

/// Page the callback redirects to when sign-in fails; receives `?message=`
/// Default: "/auth/error"
pub static AUTHKIT_ERROR_URL: LazyLock<String> =
    LazyLock::new(|| setting_or("AUTHKIT_ERROR_URL", DEFAULT_ERROR_URL));

/// Where sign-out lands when the provider returns no logout URL
/// Default: "/"
pub static AUTHKIT_SIGN_OUT_REDIRECT: LazyLock<String> =
    LazyLock::new(|| setting_or("AUTHKIT_SIGN_OUT_REDIRECT", DEFAULT_SIGN_OUT_REDIRECT));

fn setting_or(key: &str, default: &str) -> String {
    resolve(std::env::var(key).ok(), default)
}

fn resolve(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
